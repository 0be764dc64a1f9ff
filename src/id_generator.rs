use std::sync::atomic::{AtomicUsize, Ordering};

// One static counter per id space
static NEXT_VISUAL_ID: AtomicUsize = AtomicUsize::new(1);
static NEXT_TOOL_ID: AtomicUsize = AtomicUsize::new(1);

pub fn generate_visual_id() -> usize {
    NEXT_VISUAL_ID.fetch_add(1, Ordering::SeqCst)
}

pub fn generate_tool_id() -> usize {
    NEXT_TOOL_ID.fetch_add(1, Ordering::SeqCst)
}
