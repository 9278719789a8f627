/// UTF-8 safe excerpt by character count.
/// If the string exceeds `max_chars`, keeps the first `max_chars` characters
/// and appends " ...".
pub fn excerpt(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        None => s.to_string(),
        Some((end, _)) => format!("{} ...", &s[..end]),
    }
}

/// Title shown for a record: the sender, or the placeholder when empty.
pub fn sender_or<'a>(sender: &'a str, placeholder: &'a str) -> &'a str {
    if sender.trim().is_empty() {
        placeholder
    } else {
        sender
    }
}

/// Open a link with the desktop's default handler, off the UI thread.
pub fn open_link(url: &str) {
    let url = url.to_string();
    std::thread::spawn(move || {
        match std::process::Command::new("xdg-open").arg(&url).status() {
            Ok(s) if s.success() => tracing::info!(url, "opened link"),
            Ok(s) => tracing::warn!(url, "xdg-open exited: {s}"),
            Err(e) => tracing::warn!(url, "xdg-open failed: {e}"),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_short_string_unchanged() {
        assert_eq!(excerpt("hello", 10), "hello");
    }

    #[test]
    fn excerpt_at_exact_limit() {
        assert_eq!(excerpt("hello", 5), "hello");
    }

    #[test]
    fn excerpt_long_string_truncated() {
        assert_eq!(excerpt("hello world", 5), "hello ...");
    }

    #[test]
    fn excerpt_multibyte_utf8_no_panic() {
        let s = "こんにちは世界テスト";
        assert_eq!(excerpt(s, 5), "こんにちは ...");
    }

    #[test]
    fn excerpt_of_150_chars() {
        let s = "x".repeat(200);
        let out = excerpt(&s, 150);
        assert_eq!(out.chars().count(), 154);
        assert!(out.ends_with(" ..."));
    }

    #[test]
    fn excerpt_zero_limit() {
        assert_eq!(excerpt("hello", 0), " ...");
        assert_eq!(excerpt("", 0), "");
    }

    #[test]
    fn sender_placeholder() {
        assert_eq!(sender_or("", "NAN"), "NAN");
        assert_eq!(sender_or("  ", "NAN"), "NAN");
        assert_eq!(sender_or("ops", "NAN"), "ops");
    }
}
