//! Color utilities for charts

/// Default slice colors, cycled when a pie chart has more slices
pub const DEFAULT_PALETTE: [&str; 6] = [
    "#2563EB", // Blue
    "#10B981", // Green
    "#F59E0B", // Amber
    "#EF4444", // Red
    "#8B5CF6", // Purple
    "#06B6D4", // Cyan
];

/// Get a categorical color from the default palette
pub fn categorical_color(index: usize) -> &'static str {
    DEFAULT_PALETTE[index % DEFAULT_PALETTE.len()]
}

/// `len` colors cycled from the default palette
pub fn palette(len: usize) -> Vec<String> {
    (0..len).map(|i| categorical_color(i).to_string()).collect()
}
