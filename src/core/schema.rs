// trcfilter - core/schema.rs
//
// Event schema registry: the dispatch table mapping a numeric event code
// to a named report table and a positional field-extraction rule.
//
// The code→field mapping encodes externally-fixed log format knowledge and
// is reproduced exactly from the known server revisions. Two revisions
// exist because an upstream log format change shifted field offsets for
// the same event codes; both live here behind a revision selector so the
// classification engine is never duplicated.
//
// There is no reliable signal in the data to tell the revisions apart, so
// no auto-detection is attempted: running the wrong revision against a
// file produces silently wrong (but never crashing) output. The selected
// revision is logged at startup so a mismatch can at least be audited.

use crate::core::model::TableKind;
use crate::util::constants::PLACEHOLDER;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

// =============================================================================
// Schema revision
// =============================================================================

/// Which field-offset revision of the log format to classify against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaRevision {
    /// Current log format (wide field offsets).
    #[default]
    V3,
    /// Legacy Episode-8 log format (compact field offsets).
    Ep8,
}

impl SchemaRevision {
    /// Stable identifier used in CLI flags, config files, and summaries.
    pub fn id(&self) -> &'static str {
        match self {
            SchemaRevision::V3 => "v3",
            SchemaRevision::Ep8 => "ep8",
        }
    }
}

impl std::fmt::Display for SchemaRevision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for SchemaRevision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "v3" => Ok(SchemaRevision::V3),
            "ep8" => Ok(SchemaRevision::Ep8),
            other => Err(format!(
                "unknown schema revision '{other}' (expected 'v3' or 'ep8')"
            )),
        }
    }
}

// =============================================================================
// Extraction rules
// =============================================================================

/// One fragment of a composed message column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Piece {
    /// Fixed text.
    Text(&'static str),
    /// Value of the source field at this index.
    Field(usize),
}

/// How one output column is produced from a tokenized record.
///
/// Field indices refer to the post-normalization token sequence of the
/// selected revision. Bounds checking happens at application time in the
/// classifier; an out-of-range index fails the whole record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRule {
    /// Copy the source field unchanged.
    Field(usize),
    /// Source field is a Unix timestamp; format as a local date-time.
    Timestamp(usize),
    /// Product of two integer source fields (price-each × count).
    Product(usize, usize),
    /// Binary flag field mapped to a label pair.
    Flag {
        index: usize,
        zero: &'static str,
        other: &'static str,
    },
    /// Fixed value; used for columns the event does not populate.
    Literal(&'static str),
    /// Message assembled from fixed text and field references.
    Compose(&'static [Piece]),
}

/// Extraction rule for one event code: target table plus ordered columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaEntry {
    pub code: &'static str,
    pub table: TableKind,
    pub columns: &'static [ColumnRule],
}

// =============================================================================
// Declarative mapping tables
// =============================================================================

use self::ColumnRule as C;
use self::Piece as P;

/// Current-format mapping (wide offsets).
const V3_SCHEMA: &[SchemaEntry] = &[
    SchemaEntry {
        code: "5115",
        table: TableKind::PersonalShop,
        columns: &[
            C::Field(3),  // SellerCharIdx
            C::Field(10), // BuyerCharIDX
            C::Field(4),  // ItemKind
            C::Field(8),  // ItemOpt
            C::Field(11), // AlzPrice
        ],
    },
    SchemaEntry {
        code: "5131",
        table: TableKind::Trade,
        columns: &[
            C::Timestamp(0),
            C::Field(3),  // SrcCharIDX
            C::Field(10), // DesCharIDX
            C::Field(4),  // ItemKind
            C::Field(8),  // ItemOpt
            C::Literal(PLACEHOLDER),
        ],
    },
    SchemaEntry {
        code: "5203",
        table: TableKind::Trade,
        columns: &[
            C::Timestamp(0),
            C::Field(3), // SrcCharIDX
            C::Field(7), // DesCharIDX
            C::Literal(PLACEHOLDER),
            C::Literal(PLACEHOLDER),
            C::Field(5), // Alz
        ],
    },
    SchemaEntry {
        code: "51044",
        table: TableKind::AuctionHouse,
        columns: &[
            C::Field(10), // BuyerCharIdx
            C::Field(3),  // SellerCharIdx
            C::Field(6),  // ItemKind
            C::Field(7),  // ItemOpt
            C::Field(11), // AlzPriceEach
            C::Field(12), // Count
            C::Product(11, 12),
        ],
    },
    SchemaEntry {
        code: "51049",
        table: TableKind::GuildWarehouse,
        columns: &[
            C::Field(5), // GuildNo
            C::Field(6), // CharIDX
            C::Flag {
                index: 11,
                zero: "In",
                other: "Out",
            },
            C::Field(4),  // ItemKind
            C::Field(8),  // ItemOpt
            C::Field(13), // Count
            C::Literal(PLACEHOLDER),
        ],
    },
    SchemaEntry {
        code: "10953",
        table: TableKind::GuildWarehouse,
        columns: &[
            C::Field(4), // GuildNo
            C::Field(3), // CharIDX
            C::Flag {
                index: 7,
                zero: "In",
                other: "Out",
            },
            C::Literal(PLACEHOLDER),
            C::Literal(PLACEHOLDER),
            C::Literal(PLACEHOLDER),
            C::Field(9), // AlzAmount
        ],
    },
    SchemaEntry {
        code: "51019",
        table: TableKind::Mail,
        columns: &[
            C::Timestamp(0),
            C::Field(3),  // FromCharIDX
            C::Field(12), // ToCharIDX
            C::Field(4),  // ItemKind
            C::Field(8),  // ItemOpt
            C::Literal(PLACEHOLDER),
            C::Field(13), // ReceivedMailID
        ],
    },
    SchemaEntry {
        code: "5361",
        table: TableKind::Mail,
        columns: &[
            C::Timestamp(0),
            C::Field(3), // FromCharIDX
            C::Field(8), // ToCharIDX
            C::Literal(PLACEHOLDER),
            C::Literal(PLACEHOLDER),
            C::Field(5), // AlzAmount
            C::Field(9), // ReceivedMailID
        ],
    },
    SchemaEntry {
        code: "5101",
        table: TableKind::Throw,
        columns: &[
            C::Field(3), // CharacterIDX
            C::Field(8), // ItemKind
            C::Field(9), // ItemOpt
            C::Literal("Throw"),
        ],
    },
    SchemaEntry {
        code: "5102",
        table: TableKind::Throw,
        columns: &[
            C::Field(3),  // CharacterIDX
            C::Field(9),  // ItemKind
            C::Field(10), // ItemOpt
            C::Literal("Pickup"),
        ],
    },
    SchemaEntry {
        code: "51022",
        table: TableKind::Entry,
        columns: &[
            C::Timestamp(0),
            C::Field(2),
            C::Compose(&[
                P::Text("Dungeon entry used: "),
                P::Field(3),
                P::Text("-"),
                P::Field(4),
                P::Text(". Slot: "),
                P::Field(7),
                P::Text(" Dungeon: "),
                P::Field(8),
                P::Text("."),
            ]),
        ],
    },
    SchemaEntry {
        code: "6167",
        table: TableKind::Entry,
        columns: &[
            C::Timestamp(0),
            C::Field(2),
            C::Compose(&[P::Text("Dungeon: "), P::Field(3), P::Text(" started.")]),
        ],
    },
    SchemaEntry {
        code: "9",
        table: TableKind::Entry,
        columns: &[
            C::Timestamp(0),
            C::Literal(PLACEHOLDER),
            C::Compose(&[P::Text("Disconnect from IP: "), P::Field(2), P::Text(".")]),
        ],
    },
    SchemaEntry {
        code: "9103",
        table: TableKind::Entry,
        columns: &[
            C::Timestamp(0),
            C::Field(3),
            C::Compose(&[
                P::Text("Characteridx: "),
                P::Field(3),
                P::Text(" entered the channel."),
            ]),
        ],
    },
];

/// Legacy Episode-8 mapping (compact offsets).
const EP8_SCHEMA: &[SchemaEntry] = &[
    SchemaEntry {
        code: "5115",
        table: TableKind::PersonalShop,
        columns: &[
            C::Field(2), // SellerCharIdx
            C::Field(6), // BuyerCharIDX
            C::Field(3), // ItemKind
            C::Field(4), // ItemOpt
            C::Field(7), // AlzPrice
        ],
    },
    SchemaEntry {
        code: "5131",
        table: TableKind::Trade,
        columns: &[
            C::Timestamp(0),
            C::Field(2), // SrcCharIDX
            C::Field(6), // DesCharIDX
            C::Field(3), // ItemKind
            C::Field(4), // ItemOpt
            C::Literal(PLACEHOLDER),
        ],
    },
    SchemaEntry {
        code: "5203",
        table: TableKind::Trade,
        columns: &[
            C::Timestamp(0),
            C::Field(2), // SrcCharIDX
            C::Field(5), // DesCharIDX
            C::Literal(PLACEHOLDER),
            C::Literal(PLACEHOLDER),
            C::Field(3), // Alz
        ],
    },
    SchemaEntry {
        code: "51044",
        table: TableKind::AuctionHouse,
        columns: &[
            C::Field(2), // BuyerCharIdx
            C::Field(7), // SellerCharIdx
            C::Field(3), // ItemKind
            C::Field(4), // ItemOpt
            C::Field(8), // AlzPriceEach
            C::Field(9), // Count
            C::Product(8, 9),
        ],
    },
    SchemaEntry {
        code: "51049",
        table: TableKind::GuildWarehouse,
        columns: &[
            C::Field(6), // GuildNo
            C::Field(2), // CharIDX
            C::Flag {
                index: 7,
                zero: "In",
                other: "Out",
            },
            C::Field(3), // ItemKind
            C::Field(4), // ItemOpt
            C::Field(9), // Count
            C::Literal(PLACEHOLDER),
        ],
    },
    SchemaEntry {
        code: "10953",
        table: TableKind::GuildWarehouse,
        columns: &[
            C::Field(3), // GuildNo
            C::Field(2), // CharIDX
            C::Flag {
                index: 4,
                zero: "In",
                other: "Out",
            },
            C::Literal(PLACEHOLDER),
            C::Literal(PLACEHOLDER),
            C::Literal(PLACEHOLDER),
            C::Field(6), // AlzAmount
        ],
    },
    SchemaEntry {
        code: "51019",
        table: TableKind::Mail,
        columns: &[
            C::Timestamp(0),
            C::Field(2), // FromCharIDX
            C::Field(8), // ToCharIDX
            C::Field(3), // ItemKind
            C::Field(4), // ItemOpt
            C::Literal(PLACEHOLDER),
            C::Field(9), // ReceivedMailID
        ],
    },
    SchemaEntry {
        code: "5361",
        table: TableKind::Mail,
        columns: &[
            C::Timestamp(0),
            C::Field(2), // FromCharIDX
            C::Field(6), // ToCharIDX
            C::Literal(PLACEHOLDER),
            C::Literal(PLACEHOLDER),
            C::Field(3), // AlzAmount
            C::Field(7), // ReceivedMailID
        ],
    },
    SchemaEntry {
        code: "5101",
        table: TableKind::Throw,
        columns: &[
            C::Field(2), // CharacterIDX
            C::Field(3), // ItemKind
            C::Field(4), // ItemOpt
            C::Literal("Throw"),
        ],
    },
    SchemaEntry {
        code: "5102",
        table: TableKind::Throw,
        columns: &[
            C::Field(2), // CharacterIDX
            C::Field(3), // ItemKind
            C::Field(4), // ItemOpt
            C::Literal("Pickup"),
        ],
    },
    SchemaEntry {
        code: "51022",
        table: TableKind::Entry,
        columns: &[
            C::Timestamp(0),
            C::Field(2),
            C::Compose(&[
                P::Text("Dungeon entry used: "),
                P::Field(3),
                P::Text("-"),
                P::Field(4),
                P::Text(". Slot: "),
                P::Field(7),
                P::Text(" Dungeon: "),
                P::Field(8),
                P::Text("."),
            ]),
        ],
    },
    SchemaEntry {
        code: "6167",
        table: TableKind::Entry,
        columns: &[
            C::Timestamp(0),
            C::Field(2),
            C::Compose(&[P::Text("Dungeon: "), P::Field(3), P::Text(" started.")]),
        ],
    },
    SchemaEntry {
        code: "9",
        table: TableKind::Entry,
        columns: &[
            C::Timestamp(0),
            C::Literal(PLACEHOLDER),
            C::Compose(&[P::Text("Disconnect from IP: "), P::Field(2), P::Text(".")]),
        ],
    },
    SchemaEntry {
        code: "9103",
        table: TableKind::Entry,
        columns: &[
            C::Timestamp(0),
            // The Episode-8 server did not log a usable CharacterIdx field
            // for channel entries; the column stays a placeholder.
            C::Literal(PLACEHOLDER),
            C::Compose(&[
                P::Text("Characteridx: "),
                P::Field(2),
                P::Text(" entered the channel."),
            ]),
        ],
    },
];

// =============================================================================
// Registry
// =============================================================================

/// Immutable code→entry lookup, built once at startup from the declarative
/// table of the selected revision and read-only for the rest of the run.
#[derive(Debug)]
pub struct SchemaRegistry {
    revision: SchemaRevision,
    entries: HashMap<&'static str, &'static SchemaEntry>,
}

impl SchemaRegistry {
    pub fn new(revision: SchemaRevision) -> Self {
        let table = match revision {
            SchemaRevision::V3 => V3_SCHEMA,
            SchemaRevision::Ep8 => EP8_SCHEMA,
        };
        let entries = table.iter().map(|entry| (entry.code, entry)).collect();
        Self { revision, entries }
    }

    /// Look up the extraction rule for an event code.
    ///
    /// `None` is not an error: most log lines carry codes irrelevant to
    /// reporting and are silently skipped by the classifier.
    pub fn lookup(&self, code: &str) -> Option<&'static SchemaEntry> {
        self.entries.get(code).copied()
    }

    pub fn revision(&self) -> SchemaRevision {
        self.revision
    }

    /// Number of registered event codes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_hit_and_miss() {
        let registry = SchemaRegistry::new(SchemaRevision::V3);
        assert!(registry.lookup("5131").is_some());
        assert!(registry.lookup("99999").is_none());
        assert!(registry.lookup("").is_none());
        // Disabled no-entry hack detector codes are not registered.
        assert!(registry.lookup("5104").is_none());
        assert!(registry.lookup("5105").is_none());
    }

    #[test]
    fn test_both_revisions_register_the_same_codes() {
        let v3 = SchemaRegistry::new(SchemaRevision::V3);
        let ep8 = SchemaRegistry::new(SchemaRevision::Ep8);
        assert_eq!(v3.len(), 14);
        assert_eq!(ep8.len(), 14);
        for entry in V3_SCHEMA {
            let other = ep8
                .lookup(entry.code)
                .unwrap_or_else(|| panic!("ep8 missing code {}", entry.code));
            assert_eq!(entry.table, other.table, "table differs for {}", entry.code);
            assert_eq!(
                entry.columns.len(),
                other.columns.len(),
                "column count differs for {}",
                entry.code
            );
        }
    }

    #[test]
    fn test_column_counts_match_table_headers() {
        for revision in [SchemaRevision::V3, SchemaRevision::Ep8] {
            let table = match revision {
                SchemaRevision::V3 => V3_SCHEMA,
                SchemaRevision::Ep8 => EP8_SCHEMA,
            };
            for entry in table {
                assert_eq!(
                    entry.columns.len(),
                    entry.table.headers().len(),
                    "{revision}: code {} produces a row of the wrong width",
                    entry.code
                );
            }
        }
    }

    #[test]
    fn test_ep8_trade_offsets() {
        // 5131 under ep8: timestamp, src@2, des@6, itemKind@3, itemOpt@4.
        let registry = SchemaRegistry::new(SchemaRevision::Ep8);
        let entry = registry.lookup("5131").unwrap();
        assert_eq!(
            entry.columns,
            &[
                C::Timestamp(0),
                C::Field(2),
                C::Field(6),
                C::Field(3),
                C::Field(4),
                C::Literal("-"),
            ]
        );
    }

    #[test]
    fn test_v3_auction_house_product_uses_price_and_count_fields() {
        let registry = SchemaRegistry::new(SchemaRevision::V3);
        let entry = registry.lookup("51044").unwrap();
        let C::Product(lhs, rhs) = entry.columns[6] else {
            panic!("TotalPrice column must be a product rule");
        };
        assert_eq!(entry.columns[4], C::Field(lhs));
        assert_eq!(entry.columns[5], C::Field(rhs));
    }

    #[test]
    fn test_revision_parsing() {
        assert_eq!("v3".parse::<SchemaRevision>().unwrap(), SchemaRevision::V3);
        assert_eq!("EP8".parse::<SchemaRevision>().unwrap(), SchemaRevision::Ep8);
        assert!("v2".parse::<SchemaRevision>().is_err());
    }
}
