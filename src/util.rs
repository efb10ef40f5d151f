//! Small utility helpers used across modules.

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values in a
/// single pass, so substituted values are never expanded again.
/// Braces that do not wrap a known key (e.g. the JSON examples inside the
/// prompts) are left untouched.
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = String::with_capacity(tpl.len());
  let mut rest = tpl;
  while let Some(start) = rest.find('{') {
    out.push_str(&rest[..start]);
    let after = &rest[start + 1..];
    if let Some(end) = after.find(|c: char| c == '{' || c == '}') {
      if after[end..].starts_with('}') {
        let key = &after[..end];
        if let Some((_, v)) = pairs.iter().find(|(k, _)| *k == key) {
          out.push_str(v);
          rest = &after[end + 1..];
          continue;
        }
      }
    }
    out.push('{');
    rest = after;
  }
  out.push_str(rest);
  out
}

/// Log-safe truncation for large strings (char-boundary aware).
/// Avoids spamming logs with huge model responses.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.chars().count() <= max {
    s.to_string()
  } else {
    let head: String = s.chars().take(max).collect();
    format!("{}… ({} bytes total)", head, s.len())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fill_template_replaces_known_keys_only() {
    let out = fill_template("{\n  \"n\": {count}\n} {missing}", &[("count", "7")]);
    assert_eq!(out, "{\n  \"n\": 7\n} {missing}");
  }

  #[test]
  fn fill_template_replaces_every_occurrence() {
    let out = fill_template("{x}-{x}", &[("x", "a")]);
    assert_eq!(out, "a-a");
  }

  #[test]
  fn fill_template_does_not_expand_substituted_values() {
    let out = fill_template("{a}/{b}", &[("a", "{b}"), ("b", "B")]);
    assert_eq!(out, "{b}/B");
  }

  #[test]
  fn trunc_for_log_respects_multibyte_chars() {
    assert_eq!(trunc_for_log("短い", 10), "短い");
    let out = trunc_for_log("ワークシート", 3);
    assert!(out.starts_with("ワーク…"));
    assert!(out.ends_with("(18 bytes total)"));
  }
}
