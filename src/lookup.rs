//! Column type lookup
//!
//! Static many-to-one map from column-name synonyms to the semantic type
//! that drives coercion. Names are compared after [`normalize_column`], so
//! "P/E", "pe" and " PE " share one entry.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SemanticType {
    Percent,
    Float,
    MagnitudeInt,
    GroupedInt,
    Int,
    String,
}

impl SemanticType {
    /// Storage kind shown in rendered type rows
    pub fn storage(&self) -> &'static str {
        match self {
            SemanticType::Percent | SemanticType::Float => "float",
            SemanticType::MagnitudeInt | SemanticType::GroupedInt | SemanticType::Int => "int",
            SemanticType::String => "string",
        }
    }
}

const PERCENT: &[&str] = &[
    "dividend", "dividend yield", "payout ratio", "eps this y", "eps next y", "eps past 5y",
    "eps next 5y", "sales past 5y", "eps qq", "sales qq", "insider own", "insider trans",
    "inst own", "inst trans", "float short", "roa", "roe", "roi", "gross m", "gross margin",
    "oper m", "operating margin", "profit m", "profit margin", "perf week", "perf month",
    "perf quart", "perf half", "perf year", "perf ytd", "volatility w", "volatility m",
    "sma20", "sma50", "sma200", "50d high", "50d low", "52w high", "52w low", "from open",
    "gap", "change", "change from open",
];

const FLOAT: &[&str] = &[
    "p/e", "price to earnings", "fwd p/e", "forward pe", "peg", "p/s", "price to sales",
    "p/b", "price to book", "p/c", "p/fcf", "eps", "eps ttm", "curr r", "current ratio",
    "quick r", "quick ratio", "ltdebt/eq", "debt/eq", "short ratio", "beta", "atr", "rsi",
    "rsi 14", "rel volume", "price", "target price", "recom", "analyst recom",
];

const MAGNITUDE_INT: &[&str] = &[
    "market cap", "mkt cap", "outstanding", "shs outstand", "shares outstanding", "float",
    "shs float", "sales", "income",
];

const GROUPED_INT: &[&str] = &["volume", "avg volume", "employees"];

const INT: &[&str] = &["no.", "rank"];

const STRING: &[&str] = &[
    "ticker", "company", "sector", "industry", "country", "earnings", "earnings date",
    "ipo date", "date", "title", "link", "source", "source url", "category",
];

static BUILTIN: Lazy<TypeLookup> = Lazy::new(|| {
    let groups = [
        (PERCENT, SemanticType::Percent),
        (FLOAT, SemanticType::Float),
        (MAGNITUDE_INT, SemanticType::MagnitudeInt),
        (GROUPED_INT, SemanticType::GroupedInt),
        (INT, SemanticType::Int),
        (STRING, SemanticType::String),
    ];

    let mut entries = HashMap::new();
    for (names, kind) in groups {
        for name in names {
            entries.insert(normalize_column(name), kind);
        }
    }
    TypeLookup { entries }
});

/// Lowercase, drop punctuation, collapse whitespace
pub fn normalize_column(name: &str) -> String {
    let kept: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Clone, Default)]
pub struct TypeLookup {
    entries: HashMap<String, SemanticType>,
}

impl TypeLookup {
    /// Process-wide read-only lookup
    pub fn builtin() -> &'static TypeLookup {
        &BUILTIN
    }

    pub fn get(&self, column: &str) -> Option<SemanticType> {
        self.entries.get(&normalize_column(column)).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy of this lookup with extra synonyms from a JSON object, e.g.
    /// `{"Yield": "percent"}`. Overrides win over existing entries.
    pub fn with_overrides(&self, json: &str) -> Result<TypeLookup> {
        let extra: HashMap<String, SemanticType> = serde_json::from_str(json)?;
        let mut entries = self.entries.clone();
        for (name, kind) in extra {
            entries.insert(normalize_column(&name), kind);
        }
        Ok(TypeLookup { entries })
    }
}
