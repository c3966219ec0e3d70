//! Month-name table shared by every textual date rule.
//!
//! One table covers Polish (nominative and genitive forms), German (including
//! the Austrian `Jänner`/`Feber`) and English names plus the usual
//! abbreviations. Keys are folded once at load time, so lookups only ever
//! compare lower-case ASCII-ish strings. Adding a locale means adding rows to
//! [`MONTH_NAMES`]; the lookup logic does not change.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Bumped whenever [`MONTH_NAMES`] changes meaning (not for pure additions).
pub const MONTH_TABLE_VERSION: u32 = 1;

/// Raw table in priority order. Substring matching walks it top to bottom,
/// so earlier rows win ambiguous partial matches.
const MONTH_NAMES: &[(&str, u8)] = &[
    // Polish
    ("styczeń", 1), ("stycznia", 1), ("sty", 1),
    ("luty", 2), ("lutego", 2), ("lut", 2),
    ("marzec", 3), ("marca", 3), ("mar", 3),
    ("kwiecień", 4), ("kwietnia", 4), ("kwi", 4),
    ("maj", 5), ("maja", 5),
    ("czerwiec", 6), ("czerwca", 6), ("cze", 6),
    ("lipiec", 7), ("lipca", 7), ("lip", 7),
    ("sierpień", 8), ("sierpnia", 8), ("sie", 8),
    ("wrzesień", 9), ("września", 9), ("wrz", 9),
    ("październik", 10), ("października", 10), ("paź", 10),
    ("listopad", 11), ("listopada", 11), ("lis", 11),
    ("grudzień", 12), ("grudnia", 12), ("gru", 12),
    // German
    ("januar", 1), ("jänner", 1), ("jan", 1),
    ("februar", 2), ("feber", 2), ("feb", 2),
    ("märz", 3), ("mär", 3),
    ("april", 4), ("apr", 4),
    ("mai", 5),
    ("juni", 6), ("jun", 6),
    ("juli", 7), ("jul", 7),
    ("august", 8), ("aug", 8),
    ("september", 9), ("sep", 9),
    ("oktober", 10), ("okt", 10),
    ("november", 11), ("nov", 11),
    ("dezember", 12), ("dez", 12),
    // English
    ("january", 1),
    ("february", 2),
    ("march", 3),
    ("may", 5),
    ("june", 6),
    ("july", 7),
    ("october", 10),
    ("december", 12),
];

/// Folded keys in table order, duplicates removed (first occurrence kept).
static FOLDED_ORDER: Lazy<Vec<(String, u8)>> = Lazy::new(|| {
    let mut seen = HashMap::new();
    let mut ordered = Vec::with_capacity(MONTH_NAMES.len());
    for &(name, month) in MONTH_NAMES {
        let key = fold_diacritics(name);
        if seen.insert(key.clone(), month).is_none() {
            ordered.push((key, month));
        }
    }
    ordered
});

static FOLDED_INDEX: Lazy<HashMap<String, u8>> =
    Lazy::new(|| FOLDED_ORDER.iter().cloned().collect());

/// How a month name was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthMatch {
    /// The folded name is a table key.
    Exact(u8),
    /// The folded name contains a key, or a key contains it.
    Partial(u8),
    /// Nothing matched.
    Unknown,
}

impl MonthMatch {
    pub fn month(&self) -> Option<u8> {
        match self {
            MonthMatch::Exact(m) | MonthMatch::Partial(m) => Some(*m),
            MonthMatch::Unknown => None,
        }
    }
}

/// Lower-case and strip Polish/German diacritics.
///
/// `ß` is kept as is; it never appears in a month name.
pub fn fold_diacritics(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| match c {
            'ą' | 'ä' => 'a',
            'ć' => 'c',
            'ę' => 'e',
            'ł' => 'l',
            'ń' => 'n',
            'ó' | 'ö' => 'o',
            'ś' => 's',
            'ź' | 'ż' => 'z',
            'ü' => 'u',
            other => other,
        })
        .collect()
}

/// Resolve a month name or abbreviation in any supported locale.
pub fn lookup_month(name: &str) -> MonthMatch {
    let folded = fold_diacritics(name);
    if folded.is_empty() {
        return MonthMatch::Unknown;
    }

    if let Some(&month) = FOLDED_INDEX.get(&folded) {
        return MonthMatch::Exact(month);
    }

    FOLDED_ORDER
        .iter()
        .find(|(key, _)| folded.contains(key.as_str()) || key.contains(folded.as_str()))
        .map(|(_, month)| MonthMatch::Partial(*month))
        .unwrap_or(MonthMatch::Unknown)
}
