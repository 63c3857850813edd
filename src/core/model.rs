// trcfilter - core/model.rs
//
// Core data model types. Pure data definitions with no I/O.
// These types are the shared vocabulary across all layers.

use serde::Serialize;

// =============================================================================
// Report tables
// =============================================================================

/// The named report tables a classified record can land in.
///
/// Each table has a fixed column header established once at process start.
/// Multiple event codes may target the same table (item-trade and
/// currency-trade both populate [`TableKind::Trade`], with the inapplicable
/// columns holding the "-" placeholder).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TableKind {
    PersonalShop,
    Trade,
    AuctionHouse,
    GuildWarehouse,
    Mail,
    Throw,
    Entry,
}

impl TableKind {
    /// All tables in report output order.
    pub fn all() -> &'static [TableKind] {
        &[
            TableKind::AuctionHouse,
            TableKind::PersonalShop,
            TableKind::Trade,
            TableKind::GuildWarehouse,
            TableKind::Mail,
            TableKind::Throw,
            TableKind::Entry,
        ]
    }

    /// Report name, used as the output file stem.
    /// Kept identical to the original worksheet names so downstream
    /// tooling built against the old reports keeps working.
    pub fn name(&self) -> &'static str {
        match self {
            TableKind::PersonalShop => "PersonalShop_Log",
            TableKind::Trade => "Trade_Log",
            TableKind::AuctionHouse => "AuctionHouse_Log",
            TableKind::GuildWarehouse => "GuildWarehouse_Log",
            TableKind::Mail => "Mail_Log",
            TableKind::Throw => "Throw_Log",
            TableKind::Entry => "No_Entry_Hack_Log",
        }
    }

    /// Fixed column header row for this table.
    pub fn headers(&self) -> &'static [&'static str] {
        match self {
            TableKind::PersonalShop => &[
                "SellerCharIdx",
                "BuyerCharIDX",
                "ItemKind",
                "ItemOpt",
                "AlzPrice",
            ],
            TableKind::Trade => &[
                "TimeStamp",
                "SrcCharIDX",
                "DesCharIDX",
                "ItemKind",
                "ItemOpt",
                "Alz",
            ],
            TableKind::AuctionHouse => &[
                "BuyerCharIdx",
                "SellerCharIdx",
                "ItemKind",
                "ItemOpt",
                "AlzPriceEach",
                "Count",
                "TotalPrice",
            ],
            TableKind::GuildWarehouse => &[
                "GuildNo",
                "CharIDX",
                "In/Out",
                "ItemKind",
                "ItemOpt",
                "Count",
                "AlzAmount",
            ],
            TableKind::Mail => &[
                "TimeStamp",
                "FromCharIDX",
                "ToCharIDX",
                "ItemKind",
                "ItemOpt",
                "AlzAmount",
                "ReceivedMailID",
            ],
            TableKind::Throw => &["CharacterIDX", "ItemKind", "ItemOpt", "Throw/Pickup"],
            TableKind::Entry => &["TimeStamp", "CharacterIdx", "Action"],
        }
    }
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Output row
// =============================================================================

/// One classified record, ready for the report writer.
///
/// `values` is ordered to match `table.headers()`. Rows are created and
/// discarded per input line; they never outlive one iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    pub table: TableKind,
    pub values: Vec<String>,
}

// =============================================================================
// Run counters
// =============================================================================

/// Per-run statistics: one emitted-row counter per table plus skip counters.
///
/// Owned by the classifier, read at end-of-run for the summary report.
/// Skips are silent to the data but observable here for auditability.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunCounters {
    pub lines_read: u64,

    // Rows emitted per table.
    pub auction_house: u64,
    pub personal_shop: u64,
    pub trade: u64,
    pub guild_warehouse: u64,
    pub mail: u64,
    pub throw: u64,
    pub entry: u64,

    // Lines skipped, by reason.
    pub empty_after_normalize: u64,
    pub unmatched_code: u64,
    pub throw_suppressed: u64,
    pub truncated_records: u64,
    pub malformed_fields: u64,
}

impl RunCounters {
    /// Record one emitted row for `table`.
    pub fn record_row(&mut self, table: TableKind) {
        match table {
            TableKind::AuctionHouse => self.auction_house += 1,
            TableKind::PersonalShop => self.personal_shop += 1,
            TableKind::Trade => self.trade += 1,
            TableKind::GuildWarehouse => self.guild_warehouse += 1,
            TableKind::Mail => self.mail += 1,
            TableKind::Throw => self.throw += 1,
            TableKind::Entry => self.entry += 1,
        }
    }

    /// Emitted-row count for `table`.
    pub fn rows_for(&self, table: TableKind) -> u64 {
        match table {
            TableKind::AuctionHouse => self.auction_house,
            TableKind::PersonalShop => self.personal_shop,
            TableKind::Trade => self.trade,
            TableKind::GuildWarehouse => self.guild_warehouse,
            TableKind::Mail => self.mail,
            TableKind::Throw => self.throw,
            TableKind::Entry => self.entry,
        }
    }

    /// Total rows emitted across all tables.
    pub fn total_rows(&self) -> u64 {
        TableKind::all().iter().map(|t| self.rows_for(*t)).sum()
    }
}
