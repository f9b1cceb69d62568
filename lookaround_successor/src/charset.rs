use regex_syntax::hir::{ClassUnicode, ClassUnicodeRange};

/// An immutable set of Unicode scalar value ranges.
///
/// Every operation is pure: `intersect` and `union` return new sets and never
/// touch their operands. The universal set is an ordinary value, so callers
/// intersect with it like with any other set.
///
/// Two sets compare equal exactly when they hold the same scalar values. A
/// range ending at `U+D7FF` is always joined with a range starting at
/// `U+E000`, since no scalar value lies between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharSet {
    class: ClassUnicode,
}

impl CharSet {
    /// The set matching every scalar value
    pub fn full() -> Self {
        Self::range('\0', char::MAX)
    }

    /// The set matching nothing
    pub fn empty() -> Self {
        Self {
            class: ClassUnicode::empty(),
        }
    }

    fn normalized(class: ClassUnicode) -> Self {
        let ranges = class.ranges();
        if !ranges
            .windows(2)
            .any(|pair| pair[0].end() == '\u{D7FF}' && pair[1].start() == '\u{E000}')
        {
            return Self { class };
        }
        let mut joined: Vec<ClassUnicodeRange> = Vec::with_capacity(ranges.len());
        for range in ranges {
            match joined.last_mut() {
                Some(last) if last.end() == '\u{D7FF}' && range.start() == '\u{E000}' => {
                    *last = ClassUnicodeRange::new(last.start(), range.end());
                }
                _ => joined.push(*range),
            }
        }
        Self {
            class: ClassUnicode::new(joined),
        }
    }

    /// A set holding the single inclusive range `start..=end`.
    ///
    /// The bounds may be given in either order.
    pub fn range(start: char, end: char) -> Self {
        Self {
            class: ClassUnicode::new([ClassUnicodeRange::new(start, end)]),
        }
    }

    /// Build a set from inclusive ranges, which may overlap or touch.
    pub fn from_ranges<I>(ranges: I) -> Self
    where
        I: IntoIterator<Item = (char, char)>,
    {
        Self::normalized(ClassUnicode::new(
            ranges
                .into_iter()
                .map(|(start, end)| ClassUnicodeRange::new(start, end)),
        ))
    }

    /// The symbols present in both `self` and `other`
    pub fn intersect(&self, other: &CharSet) -> CharSet {
        let mut class = self.class.clone();
        class.intersect(&other.class);
        Self::normalized(class)
    }

    /// The symbols present in either `self` or `other`
    pub fn union(&self, other: &CharSet) -> CharSet {
        let mut class = self.class.clone();
        class.union(&other.class);
        Self::normalized(class)
    }

    /// The symbols present in `self` but not in `other`
    pub fn difference(&self, other: &CharSet) -> CharSet {
        let mut class = self.class.clone();
        class.difference(&other.class);
        Self::normalized(class)
    }

    pub fn is_empty(&self) -> bool {
        self.class.ranges().is_empty()
    }

    pub fn is_full(&self) -> bool {
        *self == Self::full()
    }

    pub fn is_disjoint(&self, other: &CharSet) -> bool {
        self.intersect(other).is_empty()
    }

    pub fn contains(&self, ch: char) -> bool {
        self.class
            .ranges()
            .binary_search_by(|range| {
                if range.end() < ch {
                    std::cmp::Ordering::Less
                } else if range.start() > ch {
                    std::cmp::Ordering::Greater
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .is_ok()
    }

    /// The canonical (sorted, non-overlapping, non-adjacent) inclusive ranges
    /// of this set.
    pub fn ranges(&self) -> impl Iterator<Item = (char, char)> + '_ {
        self.class.iter().map(|range| (range.start(), range.end()))
    }

    /// The underlying regex-syntax class
    pub fn class(&self) -> &ClassUnicode {
        &self.class
    }
}

impl From<ClassUnicode> for CharSet {
    fn from(class: ClassUnicode) -> Self {
        Self::normalized(class)
    }
}

impl std::fmt::Display for CharSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_full() {
            return f.write_str("[*]");
        }
        f.write_str("[")?;
        for (start, end) in self.ranges() {
            if start == end {
                write!(f, "{}", start.escape_debug())?;
            } else {
                write!(f, "{}-{}", start.escape_debug(), end.escape_debug())?;
            }
        }
        f.write_str("]")
    }
}
