//! 文档内查找与替换：关键字/正则匹配、结果导航、查询历史。

use regex::{Captures, Regex, RegexBuilder};

const HISTORY_LIMIT: usize = 20;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FindOptions {
    pub case_sensitive: bool,
    pub whole_word: bool,
    pub use_regex: bool,
}

/// 1-based line/column counted in characters; `length` is in characters too.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FindMatch {
    pub line: usize,
    pub column: usize,
    pub length: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceTarget {
    All,
    /// Index into the match list, in the order `find_matches` reports it.
    Nth(usize),
}

fn build_regex(query: &str, options: FindOptions) -> Result<Regex, regex::Error> {
    let mut pattern = if options.use_regex {
        query.to_string()
    } else {
        regex::escape(query)
    };
    if options.whole_word {
        pattern = format!(r"\b(?:{})\b", pattern);
    }
    RegexBuilder::new(&pattern)
        .case_insensitive(!options.case_sensitive)
        .multi_line(true)
        .build()
}

/// Byte offset and text of each line, terminators stripped the way `str::lines` does.
fn line_spans(text: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut offset = 0;
    text.split_inclusive('\n').map(move |raw| {
        let start = offset;
        offset += raw.len();
        let line = match raw.strip_suffix('\n') {
            Some(line) => line.strip_suffix('\r').unwrap_or(line),
            None => raw,
        };
        (start, line)
    })
}

/// Non-empty matches per line, as (0-based line index, line start offset, captures).
fn hits<'t>(regex: &Regex, text: &'t str) -> Vec<(usize, usize, Captures<'t>)> {
    let mut out = Vec::new();
    for (line_idx, (line_start, line)) in line_spans(text).enumerate() {
        for caps in regex.captures_iter(line) {
            if caps.get(0).is_some_and(|m| !m.as_str().is_empty()) {
                out.push((line_idx, line_start, caps));
            }
        }
    }
    out
}

pub fn find_matches(
    text: &str,
    query: &str,
    options: FindOptions,
) -> Result<Vec<FindMatch>, regex::Error> {
    if query.is_empty() {
        return Ok(Vec::new());
    }

    let regex = build_regex(query, options)?;
    let out = hits(&regex, text)
        .into_iter()
        .filter_map(|(line_idx, line_start, caps)| {
            let m = caps.get(0)?;
            Some(FindMatch {
                line: line_idx + 1,
                column: text[line_start..line_start + m.start()].chars().count() + 1,
                length: m.as_str().chars().count(),
            })
        })
        .collect();
    Ok(out)
}

/// Rewrites `text`, returning the new text and how many matches were replaced.
///
/// Literal queries insert `replacement` verbatim; regex queries expand `$1`/`${name}`.
/// With `preserve_case` the inserted text follows the matched text's casing.
pub fn replace_matches(
    text: &str,
    query: &str,
    replacement: &str,
    options: FindOptions,
    preserve_case: bool,
    target: ReplaceTarget,
) -> Result<(String, usize), regex::Error> {
    if query.is_empty() {
        return Ok((text.to_string(), 0));
    }

    let regex = build_regex(query, options)?;
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut replaced = 0;
    for (index, (_, line_start, caps)) in hits(&regex, text).into_iter().enumerate() {
        if target != ReplaceTarget::All && target != ReplaceTarget::Nth(index) {
            continue;
        }
        let Some(m) = caps.get(0) else {
            continue;
        };
        let mut with = String::new();
        if options.use_regex {
            caps.expand(replacement, &mut with);
        } else {
            with.push_str(replacement);
        }
        if preserve_case {
            with = match_case(m.as_str(), &with);
        }

        out.push_str(&text[last..line_start + m.start()]);
        out.push_str(&with);
        last = line_start + m.end();
        replaced += 1;
    }
    out.push_str(&text[last..]);
    Ok((out, replaced))
}

/// `FOO` -> upper, `foo` -> lower, `Foo` -> capitalised; anything else is left alone.
fn match_case(matched: &str, replacement: &str) -> String {
    let has_upper = matched.chars().any(char::is_uppercase);
    let has_lower = matched.chars().any(char::is_lowercase);
    match (has_upper, has_lower) {
        (true, false) => replacement.to_uppercase(),
        (false, true) => replacement.to_lowercase(),
        (true, true) if matched.chars().next().is_some_and(char::is_uppercase) => {
            let mut chars = replacement.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
        _ => replacement.to_string(),
    }
}

fn push_history(history: &mut Vec<String>, entry: &str) {
    let entry = entry.trim();
    if entry.is_empty() {
        return;
    }
    history.retain(|q| q != entry);
    history.insert(0, entry.to_string());
    history.truncate(HISTORY_LIMIT);
}

#[derive(Debug, Clone, Default)]
pub struct FindState {
    pub query: String,
    pub options: FindOptions,
    pub matches: Vec<FindMatch>,
    pub current: Option<usize>,
    pub error: Option<String>,
    pub replace: String,
    pub preserve_case: bool,
    history: Vec<String>,
    replace_history: Vec<String>,
}

impl FindState {
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn replace_history(&self) -> &[String] {
        &self.replace_history
    }

    pub fn current_match(&self) -> Option<FindMatch> {
        self.current.and_then(|i| self.matches.get(i).copied())
    }

    /// Recomputes matches against `text`. An invalid pattern is reported through `error`.
    pub fn refresh(&mut self, text: &str) -> bool {
        match find_matches(text, &self.query, self.options) {
            Ok(matches) => {
                let changed = matches != self.matches || self.error.is_some();
                self.error = None;
                self.current = if matches.is_empty() {
                    None
                } else {
                    Some(self.current.unwrap_or(0).min(matches.len() - 1))
                };
                self.matches = matches;
                changed
            }
            Err(e) => {
                self.error = Some(e.to_string());
                self.matches.clear();
                self.current = None;
                true
            }
        }
    }

    /// Live query edit. History is only touched by `commit_query`.
    pub fn set_query(&mut self, query: String, text: &str) -> bool {
        self.query = query;
        self.current = None;
        self.refresh(text);
        true
    }

    /// Records the current query once a search is acted on (navigate or replace).
    pub fn commit_query(&mut self) {
        push_history(&mut self.history, &self.query);
    }

    pub fn set_replace(&mut self, replace: String) -> bool {
        if self.replace == replace {
            return false;
        }
        self.replace = replace;
        true
    }

    pub fn toggle_preserve_case(&mut self) -> bool {
        self.preserve_case = !self.preserve_case;
        true
    }

    /// New text with the current match replaced, or `None` when there is nothing to replace.
    pub fn replace_current(&mut self, text: &str) -> Option<String> {
        let index = self.current?;
        self.apply_replace(text, ReplaceTarget::Nth(index))
            .map(|(out, _)| out)
    }

    /// New text with every match replaced and the number of replacements.
    pub fn replace_all(&mut self, text: &str) -> Option<(String, usize)> {
        self.apply_replace(text, ReplaceTarget::All)
    }

    fn apply_replace(&mut self, text: &str, target: ReplaceTarget) -> Option<(String, usize)> {
        if self.error.is_some() {
            return None;
        }
        let result = replace_matches(
            text,
            &self.query,
            &self.replace,
            self.options,
            self.preserve_case,
            target,
        );
        match result {
            Ok((_, 0)) => None,
            Ok(done) => {
                push_history(&mut self.history, &self.query);
                push_history(&mut self.replace_history, &self.replace);
                Some(done)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                self.matches.clear();
                self.current = None;
                None
            }
        }
    }

    pub fn toggle_case_sensitive(&mut self, text: &str) -> bool {
        self.options.case_sensitive = !self.options.case_sensitive;
        self.refresh(text);
        true
    }

    pub fn toggle_whole_word(&mut self, text: &str) -> bool {
        self.options.whole_word = !self.options.whole_word;
        self.refresh(text);
        true
    }

    pub fn toggle_regex(&mut self, text: &str) -> bool {
        self.options.use_regex = !self.options.use_regex;
        self.refresh(text);
        true
    }

    pub fn next(&mut self) -> bool {
        if self.matches.is_empty() {
            return false;
        }
        self.current = Some(match self.current {
            Some(i) => (i + 1) % self.matches.len(),
            None => 0,
        });
        true
    }

    pub fn prev(&mut self) -> bool {
        if self.matches.is_empty() {
            return false;
        }
        let len = self.matches.len();
        self.current = Some(match self.current {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        });
        true
    }

    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.matches.len() || self.current == Some(index) {
            return false;
        }
        self.current = Some(index);
        true
    }

    pub fn clear(&mut self) -> bool {
        let changed = !self.query.is_empty() || !self.matches.is_empty();
        self.query.clear();
        self.matches.clear();
        self.current = None;
        self.error = None;
        changed
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/search.rs"]
mod tests;
