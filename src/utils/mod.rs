pub mod ip;
pub mod time_parser;
pub mod time_window;

pub use time_parser::TimeParser;
pub use time_window::TimeWindow;

/// 按字符截断字符串（避免切在 UTF-8 字符中间）
pub fn truncate_chars(input: &str, max_chars: usize) -> String {
    match input.char_indices().nth(max_chars) {
        Some((idx, _)) => input[..idx].to_string(),
        None => input.to_string(),
    }
}
