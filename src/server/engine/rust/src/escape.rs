/* src/server/engine/rust/src/escape.rs */

/// Escape text for use inside a double- or single-quoted HTML attribute
/// or as element content.
///
/// Only the five characters with markup meaning are rewritten; everything
/// else (including non-ASCII) passes through, since the document is served
/// as UTF-8.
pub fn escape_html(input: &str) -> String {
  let extra = input.bytes().filter(|b| matches!(b, b'&' | b'<' | b'>' | b'"' | b'\'')).count();
  if extra == 0 {
    return input.to_string();
  }

  let mut out = String::with_capacity(input.len() + extra * 5);
  for ch in input.chars() {
    match ch {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#039;"),
      _ => out.push(ch),
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn plain_text_passthrough() {
    assert_eq!(escape_html("hello world"), "hello world");
  }

  #[test]
  fn escapes_json_quotes() {
    let input = r#"{"component":"Home"}"#;
    assert_eq!(escape_html(input), "{&quot;component&quot;:&quot;Home&quot;}");
  }

  #[test]
  fn escapes_markup_characters() {
    assert_eq!(
      escape_html("<script>a && b</script>"),
      "&lt;script&gt;a &amp;&amp; b&lt;/script&gt;"
    );
  }

  #[test]
  fn escapes_single_quote() {
    assert_eq!(escape_html("it's"), "it&#039;s");
  }

  #[test]
  fn non_ascii_untouched() {
    assert_eq!(escape_html("你好 é"), "你好 é");
  }

  #[test]
  fn empty_input() {
    assert_eq!(escape_html(""), "");
  }
}
