//! Quote records and the derived display rules for the comparison grid
//!
//! Every rule here is a pure function of one quote plus the view mode, so the
//! table, the preview pane, and the CSV export all agree on what a row shows.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Surcharges below this mapping confidence need a human look
pub const LOW_CONFIDENCE: f64 = 0.7;

/// Footprints strictly above this are classed as high impact
pub const HIGH_CARBON_KG: f64 = 1500.0;

/// Backend quote id; the API sends numbers but older payloads used strings
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct QuoteId(pub String);

impl fmt::Display for QuoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for QuoteId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Int(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Int(n) => QuoteId(n.to_string()),
            RawId::Text(s) => QuoteId(s),
        })
    }
}

impl From<&str> for QuoteId {
    fn from(s: &str) -> Self {
        QuoteId(s.to_string())
    }
}

/// A line-item fee attached to a quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Surcharge {
    #[serde(default)]
    pub raw_name: String,
    #[serde(default)]
    pub normalized_name: Option<String>,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl Surcharge {
    pub fn is_unmapped(&self) -> bool {
        self.normalized_name
            .as_deref()
            .map_or(true, |name| name.trim().is_empty())
    }

    pub fn is_low_confidence(&self) -> bool {
        self.confidence.is_some_and(|c| c < LOW_CONFIDENCE)
    }

    pub fn needs_review(&self) -> bool {
        self.is_unmapped() || self.is_low_confidence()
    }
}

/// Severity of an automated audit finding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsightStatus {
    Ok,
    Warning,
    /// Anything the backend reports that is not OK or WARNING
    Error(String),
}

impl InsightStatus {
    pub fn label(&self) -> &str {
        match self {
            InsightStatus::Ok => "OK",
            InsightStatus::Warning => "WARNING",
            InsightStatus::Error(raw) => raw.as_str(),
        }
    }
}

impl Serialize for InsightStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for InsightStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "OK" => InsightStatus::Ok,
            "WARNING" => InsightStatus::Warning,
            _ => InsightStatus::Error(raw),
        })
    }
}

/// A finding produced by one of the backend audit agents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentInsight {
    #[serde(default)]
    pub agent: String,
    #[serde(default)]
    pub finding: String,
    pub status: InsightStatus,
}

/// A normalized freight-rate record from the extraction pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub id: QuoteId,
    #[serde(default)]
    pub carrier: Option<String>,
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub total_price: f64,
    #[serde(default)]
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalized_total_price_usd: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_delta: Option<f64>,
    #[serde(default)]
    pub is_below_market: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub surcharges: Vec<Surcharge>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub risk_flags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_insights: Option<Vec<AgentInsight>>,
    #[serde(default)]
    pub is_audited: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audited_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transit_time_days: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbon_footprint_kg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub po_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_duties: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_taxes: Option<f64>,
    #[serde(default)]
    pub comment_count: u32,
    #[serde(default)]
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_path: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Carbon classification shown in the sustainability column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarbonClass {
    HighImpact,
    LowCarbon,
}

impl CarbonClass {
    pub fn label(&self) -> &'static str {
        match self {
            CarbonClass::HighImpact => "HIGH IMPACT",
            CarbonClass::LowCarbon => "LOW CARBON",
        }
    }
}

/// Market comparison badge, only shown in the normalized view
#[derive(Debug, Clone, PartialEq)]
pub struct MarketBadge {
    pub below_market: bool,
    pub magnitude: f64,
}

impl MarketBadge {
    pub fn text(&self) -> String {
        let arrow = if self.below_market { "▼" } else { "▲" };
        format!("{}{}%", arrow, self.magnitude)
    }
}

/// Everything the price column shows for one row
#[derive(Debug, Clone, PartialEq)]
pub struct PriceCell {
    pub amount: Option<f64>,
    pub currency: String,
    pub symbol: &'static str,
    pub volatile: bool,
    pub market: Option<MarketBadge>,
    pub landed_total: Option<f64>,
}

impl PriceCell {
    pub fn main_text(&self) -> String {
        match self.amount {
            Some(amount) => format!("{}{:.2} {}", self.symbol, amount, self.currency),
            None => format!("{}— {}", self.symbol, self.currency),
        }
    }

    pub fn landed_text(&self) -> Option<String> {
        self.landed_total.map(|total| format!("LANDED: ${:.2}", total))
    }
}

impl Quote {
    pub fn carrier_name(&self) -> &str {
        match self.carrier.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => "Unknown",
        }
    }

    pub fn status_label(&self) -> &str {
        match self.status.as_deref() {
            Some(status) if !status.is_empty() => status,
            _ => "DRAFT",
        }
    }

    pub fn is_allocated(&self) -> bool {
        self.po_number.as_deref().is_some_and(|po| !po.is_empty())
    }

    pub fn has_document(&self) -> bool {
        self.pdf_path.as_deref().is_some_and(|p| !p.is_empty())
    }

    pub fn has_insights(&self) -> bool {
        self.agent_insights.is_some()
    }

    pub fn insights(&self) -> &[AgentInsight] {
        self.agent_insights.as_deref().unwrap_or(&[])
    }

    /// Findings that were not OK, sent along when challenging a rate
    pub fn challenges(&self) -> Vec<AgentInsight> {
        self.insights()
            .iter()
            .filter(|i| i.status != InsightStatus::Ok)
            .cloned()
            .collect()
    }

    /// The price the grid currently shows, which is also the sort key
    pub fn displayed_price(&self, normalize: bool) -> Option<f64> {
        if normalize {
            self.normalized_total_price_usd
        } else {
            Some(self.total_price)
        }
    }

    pub fn landed_cost(&self, normalize: bool) -> Option<f64> {
        let duties = self.estimated_duties.unwrap_or(0.0);
        let taxes = self.estimated_taxes.unwrap_or(0.0);
        if duties > 0.0 || taxes > 0.0 {
            self.displayed_price(normalize)
                .map(|price| price + duties + taxes)
        } else {
            None
        }
    }

    pub fn price_cell(&self, normalize: bool) -> PriceCell {
        let market = if normalize {
            self.market_delta.map(|delta| MarketBadge {
                below_market: self.is_below_market,
                magnitude: delta.abs(),
            })
        } else {
            None
        };

        PriceCell {
            amount: self.displayed_price(normalize),
            currency: if normalize {
                "USD".to_string()
            } else {
                self.currency.clone()
            },
            symbol: if normalize { "$" } else { "" },
            volatile: self.currency == "CNY",
            market,
            landed_total: self.landed_cost(normalize),
        }
    }

    pub fn review_count(&self) -> usize {
        self.surcharges.iter().filter(|s| s.needs_review()).count()
    }

    pub fn unmapped_count(&self) -> usize {
        self.surcharges.iter().filter(|s| s.is_unmapped()).count()
    }

    pub fn has_uncertain_mapping(&self) -> bool {
        self.surcharges.iter().any(Surcharge::is_low_confidence)
    }

    pub fn carbon_class(&self) -> Option<CarbonClass> {
        self.carbon_footprint_kg.map(|kg| {
            if kg > HIGH_CARBON_KG {
                CarbonClass::HighImpact
            } else {
                CarbonClass::LowCarbon
            }
        })
    }

    pub fn carbon_text(&self) -> String {
        match self.carbon_footprint_kg {
            Some(kg) => format!("{:.0} kg CO2", kg),
            None => "N/A".to_string(),
        }
    }

    pub fn transit_text(&self) -> String {
        match self.transit_time_days {
            Some(days) if days > 0.0 => format!("{} Days", days),
            _ => "N/A".to_string(),
        }
    }

    pub fn surcharge_text(&self) -> String {
        format!("{} items", self.surcharges.len())
    }

    pub fn review_text(&self) -> Option<String> {
        match self.review_count() {
            0 => None,
            n => Some(format!("{} NEEDS REVIEW", n)),
        }
    }

    /// Spend figure for summaries: normalized when known, raw otherwise
    pub fn spend(&self) -> f64 {
        self.normalized_total_price_usd
            .filter(|v| *v != 0.0)
            .unwrap_or(self.total_price)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn quote(id: &str) -> Quote {
        Quote {
            id: QuoteId::from(id),
            carrier: Some("Maersk".to_string()),
            origin: "Shanghai".to_string(),
            destination: "Rotterdam".to_string(),
            total_price: 1000.0,
            currency: "USD".to_string(),
            normalized_total_price_usd: Some(1000.0),
            market_delta: None,
            is_below_market: false,
            surcharges: Vec::new(),
            risk_flags: Vec::new(),
            agent_insights: None,
            is_audited: false,
            audited_by: None,
            transit_time_days: Some(28.0),
            carbon_footprint_kg: None,
            po_number: None,
            status: None,
            estimated_duties: None,
            estimated_taxes: None,
            comment_count: 0,
            filename: format!("quote_{}.pdf", id),
            pdf_path: None,
        }
    }

    pub fn surcharge(name: &str, normalized: Option<&str>, confidence: Option<f64>) -> Surcharge {
        Surcharge {
            raw_name: name.to_string(),
            normalized_name: normalized.map(str::to_string),
            amount: 50.0,
            confidence,
        }
    }

    pub fn insight(agent: &str, status: InsightStatus) -> AgentInsight {
        AgentInsight {
            agent: agent.to_string(),
            finding: format!("{} finding", agent),
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_deserialize_backend_payload() {
        let json = r#"{
            "id": 1,
            "carrier": "Maersk",
            "total_price": 1000,
            "currency": "USD",
            "surcharges": [{"raw_name": "BAF", "amount": 50}],
            "risk_flags": null,
            "agent_insights": [{"agent": "Auditor", "finding": "ok", "status": "CRITICAL"}],
            "carbon_footprint_kg": 1600,
            "filename": "maersk.pdf"
        }"#;

        let quote: Quote = serde_json::from_str(json).unwrap();
        assert_eq!(quote.id, QuoteId::from("1"));
        assert!(quote.risk_flags.is_empty());
        assert_eq!(quote.surcharges.len(), 1);
        assert!(quote.surcharges[0].normalized_name.is_none());
        assert_eq!(
            quote.insights()[0].status,
            InsightStatus::Error("CRITICAL".to_string())
        );
        assert_eq!(quote.status_label(), "DRAFT");
    }

    #[test]
    fn test_string_ids_are_accepted() {
        let quote: Quote = serde_json::from_str(r#"{"id": "q-7"}"#).unwrap();
        assert_eq!(quote.id.to_string(), "q-7");
    }

    #[test]
    fn test_maersk_scenario() {
        let mut q = quote("1");
        q.surcharges = vec![surcharge("BAF", None, None)];
        q.carbon_footprint_kg = Some(1600.0);

        assert_eq!(q.surcharge_text(), "1 items");
        assert_eq!(q.review_text().as_deref(), Some("1 NEEDS REVIEW"));
        assert_eq!(q.carbon_text(), "1600 kg CO2");
        assert_eq!(q.carbon_class(), Some(CarbonClass::HighImpact));
    }

    #[test]
    fn test_carbon_threshold_is_strict() {
        let mut q = quote("1");
        q.carbon_footprint_kg = Some(1500.0);
        assert_eq!(q.carbon_class(), Some(CarbonClass::LowCarbon));

        q.carbon_footprint_kg = Some(1500.01);
        assert_eq!(q.carbon_class(), Some(CarbonClass::HighImpact));

        q.carbon_footprint_kg = None;
        assert_eq!(q.carbon_class(), None);
        assert_eq!(q.carbon_text(), "N/A");
    }

    #[test]
    fn test_zero_figures_are_reported_values() {
        let mut q = quote("1");
        q.carbon_footprint_kg = Some(0.0);
        q.normalized_total_price_usd = Some(0.0);
        assert_eq!(q.carbon_text(), "0 kg CO2");
        assert_eq!(q.carbon_class(), Some(CarbonClass::LowCarbon));
        assert_eq!(q.displayed_price(true), Some(0.0));
    }

    #[test]
    fn test_review_counts_unmapped_and_low_confidence() {
        let mut q = quote("1");
        q.surcharges = vec![
            surcharge("BAF", Some("Bunker Adjustment"), Some(0.95)),
            surcharge("THC", Some("Terminal Handling"), Some(0.5)),
            surcharge("XYZ", None, Some(0.99)),
            surcharge("PSS", Some("Peak Season"), Some(0.7)),
        ];

        assert_eq!(q.review_count(), 2);
        assert_eq!(q.unmapped_count(), 1);
        assert!(q.has_uncertain_mapping());
    }

    #[test]
    fn test_cny_is_volatile_in_both_views() {
        let mut q = quote("1");
        q.currency = "CNY".to_string();
        q.total_price = 7000.0;

        assert!(q.price_cell(false).volatile);
        assert!(q.price_cell(true).volatile);
    }

    #[test]
    fn test_price_cell_symbols() {
        let mut q = quote("1");
        q.currency = "EUR".to_string();
        q.total_price = 900.0;
        q.normalized_total_price_usd = Some(980.5);

        assert_eq!(q.price_cell(false).main_text(), "900.00 EUR");
        assert_eq!(q.price_cell(true).main_text(), "$980.50 USD");
    }

    #[test]
    fn test_market_badge_only_in_normalized_view() {
        let mut q = quote("1");
        q.market_delta = Some(-12.0);
        q.is_below_market = true;

        assert!(q.price_cell(false).market.is_none());
        let badge = q.price_cell(true).market.unwrap();
        assert_eq!(badge.text(), "▼12%");
    }

    #[test]
    fn test_landed_cost_hidden_when_zero() {
        let mut q = quote("1");
        q.estimated_duties = Some(0.0);
        q.estimated_taxes = Some(0.0);
        assert!(q.price_cell(false).landed_text().is_none());

        q.estimated_taxes = Some(50.0);
        assert_eq!(q.landed_cost(false), Some(1050.0));

        q.estimated_duties = Some(25.5);
        assert_eq!(q.landed_cost(false), Some(1075.5));
        assert_eq!(
            q.price_cell(false).landed_text().as_deref(),
            Some("LANDED: $1075.50")
        );
    }

    #[test]
    fn test_challenges_skip_ok_findings() {
        let mut q = quote("1");
        q.agent_insights = Some(vec![
            insight("Pricing", InsightStatus::Ok),
            insight("Compliance", InsightStatus::Warning),
            insight("Fraud", InsightStatus::Error("ERROR".to_string())),
        ]);

        let challenges = q.challenges();
        assert_eq!(challenges.len(), 2);
        assert_eq!(challenges[0].agent, "Compliance");
    }

    #[test]
    fn test_transit_text() {
        let mut q = quote("1");
        assert_eq!(q.transit_text(), "28 Days");
        q.transit_time_days = Some(0.0);
        assert_eq!(q.transit_text(), "N/A");
    }
}
