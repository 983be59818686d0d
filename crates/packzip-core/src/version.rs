//! Loose version ordering for pack release directories.
//!
//! Version strings are free-form (`1.2.10`, `2.0.0rc1`, `1.0-beta`). They are
//! split into numeric and alpha components and compared component-wise, so
//! `1.10.0` sorts above `1.9.3` and `1.0` sorts below `1.0.1`.

use std::cmp::Ordering;
use std::fmt;

/// One component of a loose version. Equality follows `Ord`, so
/// `Numeric("01") == Numeric("1")`.
#[derive(Debug, Clone)]
pub enum Component {
    /// Run of ASCII digits. Kept as text so arbitrarily long numbers still compare.
    Numeric(String),
    /// Any other non-dot run (letters, `-`, `+`, ...).
    Alpha(String),
}

impl Component {
    fn numeric_cmp(a: &str, b: &str) -> Ordering {
        let a = a.trim_start_matches('0');
        let b = b.trim_start_matches('0');
        a.len().cmp(&b.len()).then_with(|| a.cmp(b))
    }
}

impl Ord for Component {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Component::Numeric(a), Component::Numeric(b)) => Component::numeric_cmp(a, b),
            (Component::Alpha(a), Component::Alpha(b)) => a.cmp(b),
            (Component::Numeric(_), Component::Alpha(_)) => Ordering::Less,
            (Component::Alpha(_), Component::Numeric(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Component {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Component {}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Class {
    Digit,
    Lower,
    Other,
}

fn class_of(c: char) -> Class {
    if c.is_ascii_digit() {
        Class::Digit
    } else if c.is_ascii_lowercase() {
        Class::Lower
    } else {
        Class::Other
    }
}

/// A parsed loose version. Equality and ordering are component-wise;
/// `1.01` and `1.1` compare equal.
#[derive(Debug, Clone)]
pub struct LooseVersion {
    raw: String,
    components: Vec<Component>,
}

impl LooseVersion {
    /// Parse a version string. Never fails; an empty string yields no components
    /// and sorts below every non-empty version.
    pub fn parse(raw: &str) -> Self {
        let mut components = Vec::new();
        let mut current = String::new();
        let mut current_class = Class::Other;

        let mut flush = |buf: &mut String, class: Class| {
            if buf.is_empty() {
                return;
            }
            let text = std::mem::take(buf);
            components.push(match class {
                Class::Digit => Component::Numeric(text),
                Class::Lower | Class::Other => Component::Alpha(text),
            });
        };

        for c in raw.chars() {
            if c == '.' {
                flush(&mut current, current_class);
                continue;
            }
            let class = class_of(c);
            if !current.is_empty() && class != current_class {
                flush(&mut current, current_class);
            }
            current_class = class;
            current.push(c);
        }
        flush(&mut current, current_class);

        Self {
            raw: raw.to_string(),
            components,
        }
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl Ord for LooseVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.components.cmp(&other.components)
    }
}

impl PartialOrd for LooseVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for LooseVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for LooseVersion {}

impl fmt::Display for LooseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
