use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::parser::TagParser;
use super::Tag;
use crate::note::Note;

/// Debounce window for keystroke-driven index updates.
pub const DEFAULT_UPDATE_DELAY: Duration = Duration::from_millis(300);

const POPULAR_TAG_FALLBACK_LIMIT: usize = 10;

/// One fully-formed view of tag usage across the note collection. Rebuilt
/// wholesale on every recomputation and published atomically; readers see
/// either the old snapshot or the new one, never a mix.
#[derive(Debug, Clone, Default)]
pub struct TagSnapshot {
    pub tags_by_name: HashMap<String, Tag>,
    pub sorted_tags: Vec<Tag>,
    pub usage_counts: HashMap<String, usize>,
}

/// Lightweight copy of the fields the scan needs, so recomputation never
/// borrows live notes.
#[derive(Debug, Clone)]
struct NoteText {
    title: String,
    content: String,
}

struct Pending {
    generation: u64,
    payload: Vec<NoteText>,
    handle: JoinHandle<()>,
}

struct Inner {
    snapshot_tx: watch::Sender<Arc<TagSnapshot>>,
    pending: Mutex<Option<Pending>>,
    generation: AtomicU64,
    recomputes: AtomicU64,
    delay: Duration,
}

/// Debounced, race-safe tag index over the full note collection.
///
/// `schedule_update` coalesces with last-write-wins semantics: repeated calls
/// within the debounce window replace the pending payload and restart the
/// timer, so intermediate states are never computed. Recomputation runs on a
/// blocking worker and publishes through a watch channel. Must be used from
/// within a tokio runtime.
#[derive(Clone)]
pub struct TagIndex {
    inner: Arc<Inner>,
}

impl TagIndex {
    pub fn new() -> Self {
        Self::with_delay(DEFAULT_UPDATE_DELAY)
    }

    pub fn with_delay(delay: Duration) -> Self {
        let (snapshot_tx, _) = watch::channel(Arc::new(TagSnapshot::default()));
        Self {
            inner: Arc::new(Inner {
                snapshot_tx,
                pending: Mutex::new(None),
                generation: AtomicU64::new(0),
                recomputes: AtomicU64::new(0),
                delay,
            }),
        }
    }

    /// Registers `notes` as the latest known state and (re)arms the debounce
    /// timer. A superseded timer can never publish: it checks its generation
    /// against the pending slot before reading the payload. The slot stays
    /// occupied until the recompute has published, so `flush` always sees
    /// in-flight work.
    pub fn schedule_update(&self, notes: &[Note]) {
        let payload = lightweight(notes);
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let mut pending = self.inner.pending.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(prev) = pending.take() {
            prev.handle.abort();
        }

        let inner = self.inner.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(inner.delay).await;
            let payload = {
                let pending = inner.pending.lock().unwrap_or_else(|e| e.into_inner());
                match pending.as_ref() {
                    Some(p) if p.generation == generation => p.payload.clone(),
                    // A newer schedule or a flush owns the slot now.
                    _ => return,
                }
            };
            recompute(&inner, payload).await;
            let mut pending = inner.pending.lock().unwrap_or_else(|e| e.into_inner());
            if matches!(pending.as_ref(), Some(p) if p.generation == generation) {
                pending.take();
            }
        });

        *pending = Some(Pending {
            generation,
            payload,
            handle,
        });
    }

    /// Cancels any pending debounce and recomputes now. Used on lifecycle
    /// boundaries where lagging tag data must not be lost.
    pub async fn update_immediately(&self, notes: &[Note]) {
        self.cancel_pending();
        recompute(&self.inner, lightweight(notes)).await;
    }

    /// If a debounced update is pending or mid-recompute, runs it inline
    /// before returning, so subsequent reads observe the scheduled state.
    pub async fn flush(&self) {
        let payload = {
            let mut pending = self.inner.pending.lock().unwrap_or_else(|e| e.into_inner());
            pending.take().map(|p| {
                p.handle.abort();
                p.payload
            })
        };
        if let Some(payload) = payload {
            recompute(&self.inner, payload).await;
        }
    }

    fn cancel_pending(&self) {
        let mut pending = self.inner.pending.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(prev) = pending.take() {
            prev.handle.abort();
        }
    }

    /// The current snapshot. O(1); the Arc keeps the view stable while the
    /// caller iterates even if a recomputation publishes meanwhile.
    pub fn snapshot(&self) -> Arc<TagSnapshot> {
        self.inner.snapshot_tx.borrow().clone()
    }

    /// Snapshot-changed signal for UI consumers.
    pub fn subscribe(&self) -> watch::Receiver<Arc<TagSnapshot>> {
        self.inner.snapshot_tx.subscribe()
    }

    pub fn get_tag(&self, name: &str) -> Option<Tag> {
        self.snapshot().tags_by_name.get(&name.to_lowercase()).cloned()
    }

    pub fn get_most_popular_tags(&self, limit: usize) -> Vec<Tag> {
        self.snapshot().sorted_tags.iter().take(limit).cloned().collect()
    }

    /// Tags matching a partial name, for autocomplete. An empty partial falls
    /// back to the most popular tags. `exclude` names the tag currently being
    /// typed (with or without `#`) so a half-typed tag never suggests itself.
    pub fn get_matching_tags(&self, partial: &str, exclude: Option<&str>) -> Vec<Tag> {
        let snapshot = self.snapshot();
        let partial = partial.to_lowercase();
        if partial.is_empty() {
            return snapshot
                .sorted_tags
                .iter()
                .take(POPULAR_TAG_FALLBACK_LIMIT)
                .cloned()
                .collect();
        }

        let exclude = exclude.map(|e| e.trim_start_matches('#').to_lowercase());
        snapshot
            .sorted_tags
            .iter()
            .filter(|tag| tag.id.starts_with(&partial) && Some(&tag.id) != exclude.as_ref())
            .cloned()
            .collect()
    }

    pub fn tag_exists(&self, name: &str) -> bool {
        self.snapshot().usage_counts.contains_key(&name.to_lowercase())
    }

    pub fn usage_count(&self, name: &str) -> usize {
        self.snapshot()
            .usage_counts
            .get(&name.to_lowercase())
            .copied()
            .unwrap_or(0)
    }

    /// Number of index rebuilds since construction. Diagnostics only.
    pub fn recompute_count(&self) -> u64 {
        self.inner.recomputes.load(Ordering::SeqCst)
    }
}

impl Default for TagIndex {
    fn default() -> Self {
        Self::new()
    }
}

fn lightweight(notes: &[Note]) -> Vec<NoteText> {
    notes
        .iter()
        .map(|n| NoteText {
            title: n.title.clone(),
            content: n.content.clone(),
        })
        .collect()
}

async fn recompute(inner: &Arc<Inner>, payload: Vec<NoteText>) {
    let scan = tokio::task::spawn_blocking(move || build_snapshot(&payload));
    if let Ok(snapshot) = scan.await {
        inner.recomputes.fetch_add(1, Ordering::SeqCst);
        inner.snapshot_tx.send_replace(Arc::new(snapshot));
    }
}

/// Full scan over the note collection. Usage counts once per note containing
/// the tag, not per occurrence; display case is first-seen across the scan.
fn build_snapshot(notes: &[NoteText]) -> TagSnapshot {
    let mut usage_counts: HashMap<String, usize> = HashMap::new();
    let mut display_names: HashMap<String, String> = HashMap::new();

    for note in notes {
        let mut combined = String::with_capacity(note.title.len() + 1 + note.content.len());
        combined.push_str(&note.title);
        combined.push(' ');
        combined.push_str(&note.content);

        let (normalized_to_display, unique) = TagParser::extract_normalized_and_display(&combined);
        for id in unique {
            *usage_counts.entry(id.clone()).or_insert(0) += 1;
            if let Some(display) = normalized_to_display.get(&id) {
                display_names.entry(id).or_insert_with(|| display.clone());
            }
        }
    }

    let mut tags_by_name: HashMap<String, Tag> = HashMap::new();
    for (id, count) in &usage_counts {
        let display = display_names.get(id).cloned().unwrap_or_else(|| id.clone());
        let mut tag = Tag::new(&display);
        tag.usage_count = *count;
        tags_by_name.insert(id.clone(), tag);
    }

    let mut sorted_tags: Vec<Tag> = tags_by_name.values().cloned().collect();
    sorted_tags.sort_by(|a, b| {
        b.usage_count
            .cmp(&a.usage_count)
            .then_with(|| a.display_name.cmp(&b.display_name))
    });

    TagSnapshot {
        tags_by_name,
        sorted_tags,
        usage_counts,
    }
}
