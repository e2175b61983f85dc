// Module exports for pure logic
pub mod display_title;       // Title truncation
pub mod selector;            // Title element lookup key
pub mod match_pattern;       // Tab URL filter
pub mod title_sync;          // Content-side watcher
pub mod tab_environment;     // Browser capability seam
pub mod tab_roster;          // Popup list + row activation
