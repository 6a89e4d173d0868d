//! In-memory quote dataset backed by a CSV file

use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Writer};
use tracing::{debug, info, warn};

use super::normalizer::normalize_snapshot;
use super::quote::{QuoteField, QuoteRecord, parse_number};
use crate::error::{InsightError, Result};

/// Label used by the index row itself
pub const INDEX_SYMBOL: &str = "NIFTY 50";

/// Industry filter value meaning "no filter"
pub const ALL_INDUSTRIES: &str = "All";

const SYMBOL_COLUMN: &str = "symbol";
const COMPANY_COLUMN: &str = "companyName";
const INDUSTRY_COLUMN: &str = "industry";

/// Immutable set of quote rows, keyed by symbol
///
/// Built once at startup. When a symbol appears more than once the first row
/// wins.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<QuoteRecord>,
    by_symbol: HashMap<String, usize>,
}

impl Dataset {
    /// Build a dataset from already normalized records
    pub fn from_records(records: Vec<QuoteRecord>) -> Self {
        let mut by_symbol = HashMap::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            by_symbol.entry(record.symbol.clone()).or_insert(idx);
        }
        Self { records, by_symbol }
    }

    /// Build a dataset from a raw exchange snapshot
    ///
    /// Records that fail normalization are skipped.
    pub fn from_snapshot(snapshot: &serde_json::Value) -> Result<Self> {
        let normalized = normalize_snapshot(snapshot)?;
        if !normalized.skipped.is_empty() {
            warn!(
                "{} snapshot records were skipped during normalization",
                normalized.skipped.len()
            );
        }
        Ok(Self::from_records(normalized.records))
    }

    /// Load the dataset, falling back to an empty one on any error
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(dataset) => dataset,
            Err(e) => {
                warn!("Could not load dataset from {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Load the dataset from a CSV file
    pub fn try_load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let dataset = Self::from_reader(file)?;
        info!("Loaded {} quotes from {}", dataset.len(), path.display());
        Ok(dataset)
    }

    /// Parse CSV rows from any reader
    ///
    /// Missing columns load as `None`, as do cells that are not numbers.
    /// Rows that cannot be decoded are skipped.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers = reader.headers()?.clone();
        let columns = ColumnIndex::new(&headers)?;

        let mut records = Vec::new();
        for (idx, row) in reader.records().enumerate() {
            let line = idx + 2;
            let row = match row {
                Ok(row) => row,
                Err(e) => {
                    warn!("Skipping undecodable dataset row {line}: {e}");
                    continue;
                }
            };
            match columns.record(&row) {
                Some(record) => records.push(record),
                None => debug!("Skipping dataset row {line} without a symbol"),
            }
        }

        Ok(Self::from_records(records))
    }

    /// Write the dataset as CSV
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path)?;
        self.to_writer(file)?;
        info!("Wrote {} quotes to {}", self.len(), path.display());
        Ok(())
    }

    /// Serialize CSV rows into any writer
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = Writer::from_writer(writer);

        let mut header = vec![SYMBOL_COLUMN, COMPANY_COLUMN, INDUSTRY_COLUMN];
        header.extend(QuoteField::ALL.iter().map(QuoteField::column));
        writer.write_record(&header)?;

        for record in &self.records {
            let mut row = vec![
                record.symbol.clone(),
                record.company_name.clone().unwrap_or_default(),
                record.industry.clone().unwrap_or_default(),
            ];
            row.extend(
                QuoteField::ALL
                    .iter()
                    .map(|field| record.get(*field).map_or(String::new(), |v| v.to_string())),
            );
            writer.write_record(&row)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Look up a symbol
    pub fn get(&self, symbol: &str) -> Option<&QuoteRecord> {
        self.by_symbol.get(symbol).map(|idx| &self.records[*idx])
    }

    /// Look up a symbol, failing with `MissingSymbol`
    pub fn require(&self, symbol: &str) -> Result<&QuoteRecord> {
        self.get(symbol)
            .ok_or_else(|| InsightError::MissingSymbol(symbol.to_string()))
    }

    /// All records in file order
    pub fn records(&self) -> &[QuoteRecord] {
        &self.records
    }

    /// All distinct symbols in file order
    pub fn symbols(&self) -> Vec<&str> {
        self.records
            .iter()
            .enumerate()
            .filter(|(idx, r)| self.by_symbol.get(&r.symbol) == Some(idx))
            .map(|(_, r)| r.symbol.as_str())
            .collect()
    }

    /// Distinct non-empty industries, sorted
    pub fn industries(&self) -> Vec<&str> {
        let mut industries: Vec<&str> = self
            .records
            .iter()
            .filter_map(|r| r.industry.as_deref())
            .filter(|i| !i.trim().is_empty())
            .collect();
        industries.sort_unstable();
        industries.dedup();
        industries
    }

    /// Records of one industry; `"All"` returns every record
    pub fn filter_by_industry(&self, industry: &str) -> Vec<&QuoteRecord> {
        if industry == ALL_INDUSTRIES {
            return self.records.iter().collect();
        }
        self.records
            .iter()
            .filter(|r| r.industry.as_deref() == Some(industry))
            .collect()
    }

    /// Human label for a symbol picker
    ///
    /// The index row keeps its bare name; other rows read `"SYMBOL - Company"`
    /// when the company is known.
    pub fn display_label(&self, symbol: &str) -> String {
        if symbol == INDEX_SYMBOL {
            return symbol.to_string();
        }
        match self.get(symbol).and_then(|r| r.company_name.as_deref()) {
            Some(company) => format!("{symbol} - {company}"),
            None => symbol.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Header positions of the known columns
struct ColumnIndex {
    symbol: usize,
    company: Option<usize>,
    industry: Option<usize>,
    numeric: Vec<(QuoteField, usize)>,
}

impl ColumnIndex {
    fn new(headers: &StringRecord) -> Result<Self> {
        let position = |name: &str| headers.iter().position(|h| h.trim() == name);

        let symbol = position(SYMBOL_COLUMN).ok_or_else(|| {
            InsightError::Dataset(format!("missing '{SYMBOL_COLUMN}' column"))
        })?;

        let numeric = QuoteField::ALL
            .iter()
            .filter_map(|field| position(field.column()).map(|idx| (*field, idx)))
            .collect();

        Ok(Self {
            symbol,
            company: position(COMPANY_COLUMN),
            industry: position(INDUSTRY_COLUMN),
            numeric,
        })
    }

    fn record(&self, row: &StringRecord) -> Option<QuoteRecord> {
        let text = |idx: Option<usize>| {
            idx.and_then(|i| row.get(i))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let symbol = text(Some(self.symbol))?;
        let mut record = QuoteRecord::new(symbol);
        record.company_name = text(self.company);
        record.industry = text(self.industry);

        for (field, idx) in &self.numeric {
            *record.slot_mut(*field) = row.get(*idx).and_then(parse_number);
        }

        Some(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
symbol,companyName,industry,open,dayHigh,dayLow,lastPrice,previousClose,change,pChange,yearHigh,yearLow,totalTradedVolume,totalTradedValue,perChange365d,perChange30d
NIFTY 50,,,24100,24250,24050,24200.5,24080,120.5,0.5,26277,21281,250000000,190000000000,10.2,-1.3
INFY,Infosys Limited,Computers - Software & Consulting,1510,1532.4,1505.1,1520.35,1498.2,22.15,1.48,1980,1350,5123456,7789000000,8.2,-2.1
TCS,Tata Consultancy Services Limited,Computers - Software & Consulting,3900,3950,3880,3925,3890,35,0.9,4592,3311,-,\"12,500,000,000\",-5.5,3.2
HDFCBANK,HDFC Bank Limited,Private Sector Bank,1700,1720,1690,1710,1695,15,0.88,1794,1363,9000000,15400000000,12,4
";

    fn sample() -> Dataset {
        Dataset::from_reader(SAMPLE.as_bytes()).unwrap()
    }

    #[test]
    fn test_load_from_reader() {
        let dataset = sample();
        assert_eq!(dataset.len(), 4);

        let tcs = dataset.get("TCS").unwrap();
        assert_eq!(tcs.total_traded_volume, None);
        assert_eq!(tcs.total_traded_value, Some(12_500_000_000.0));

        let index = dataset.get(INDEX_SYMBOL).unwrap();
        assert_eq!(index.company_name, None);
        assert_eq!(index.industry, None);
    }

    #[test]
    fn test_undecodable_row_is_skipped() {
        let mut csv = b"symbol,lastPrice\nINFY,1520.35\n".to_vec();
        csv.extend_from_slice(b"BAD\xff\xfe,1.0\n");
        csv.extend_from_slice(b"TCS,3925\n");

        let dataset = Dataset::from_reader(csv.as_slice()).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.get("INFY").unwrap().last_price, Some(1520.35));
        assert_eq!(dataset.get("TCS").unwrap().last_price, Some(3925.0));
    }

    #[test]
    fn test_missing_columns_load_as_none() {
        let csv = "symbol,lastPrice\nITC,450.5\n";
        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();
        let itc = dataset.get("ITC").unwrap();
        assert_eq!(itc.last_price, Some(450.5));
        assert_eq!(itc.year_high, None);
        assert_eq!(itc.industry, None);
    }

    #[test]
    fn test_missing_symbol_column_is_an_error() {
        let csv = "ticker,lastPrice\nITC,450.5\n";
        let result = Dataset::from_reader(csv.as_bytes());
        assert!(matches!(result, Err(InsightError::Dataset(_))));
    }

    #[test]
    fn test_load_never_fails() {
        let dataset = Dataset::load("/definitely/not/here.csv");
        assert!(dataset.is_empty());
        assert!(matches!(
            dataset.require("INFY"),
            Err(InsightError::MissingSymbol(_))
        ));
    }

    #[test]
    fn test_csv_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stock_data.csv");

        let original = sample();
        original.write_csv(&path).unwrap();
        let reloaded = Dataset::try_load(&path).unwrap();

        assert_eq!(reloaded.records(), original.records());
    }

    #[test]
    fn test_industries_sorted_and_distinct() {
        assert_eq!(
            sample().industries(),
            vec!["Computers - Software & Consulting", "Private Sector Bank"]
        );
    }

    #[test]
    fn test_filter_by_industry() {
        let dataset = sample();
        assert_eq!(dataset.filter_by_industry(ALL_INDUSTRIES).len(), 4);

        let it: Vec<&str> = dataset
            .filter_by_industry("Computers - Software & Consulting")
            .iter()
            .map(|r| r.symbol.as_str())
            .collect();
        assert_eq!(it, vec!["INFY", "TCS"]);

        assert!(dataset.filter_by_industry("Shipping").is_empty());
    }

    #[test]
    fn test_display_label() {
        let dataset = sample();
        assert_eq!(dataset.display_label("NIFTY 50"), "NIFTY 50");
        assert_eq!(dataset.display_label("INFY"), "INFY - Infosys Limited");
        assert_eq!(dataset.display_label("UNKNOWN"), "UNKNOWN");
    }

    #[test]
    fn test_from_snapshot() {
        let snapshot = serde_json::json!({
            "data": [
                {
                    "symbol": "ITC",
                    "meta": { "companyName": "ITC Limited", "industry": "Diversified FMCG" },
                    "open": 450, "dayHigh": 455, "dayLow": 448, "lastPrice": 452.3,
                    "previousClose": 449, "change": 3.3, "pChange": 0.73,
                    "yearHigh": 528.5, "yearLow": 399.35, "totalTradedVolume": 1200000,
                    "totalTradedValue": 542760000, "perChange365d": 4.1, "perChange30d": "-"
                },
                { "symbol": "BROKEN" }
            ]
        });

        let dataset = Dataset::from_snapshot(&snapshot).unwrap();
        assert_eq!(dataset.symbols(), vec!["ITC"]);
        assert_eq!(dataset.get("ITC").unwrap().per_change_30d, None);
        assert_eq!(dataset.display_label("ITC"), "ITC - ITC Limited");
    }

    #[test]
    fn test_duplicate_symbol_keeps_first() {
        let dataset = Dataset::from_records(vec![
            QuoteRecord::new("ITC").with(QuoteField::LastPrice, 1.0),
            QuoteRecord::new("ITC").with(QuoteField::LastPrice, 2.0),
        ]);
        assert_eq!(dataset.get("ITC").unwrap().last_price, Some(1.0));
        assert_eq!(dataset.symbols(), vec!["ITC"]);
    }
}
