//! Payloads exchanged by the row-level workflows

use serde::{Deserialize, Serialize};

/// Booking email generated for a quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailDraft {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
}

/// Outbound message drafted by the backend, reviewed before sending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundDraft {
    #[serde(default)]
    pub action: String,
    #[serde(default, alias = "subject")]
    pub draft_subject: String,
    #[serde(default, alias = "body")]
    pub draft_body: String,
}

/// Message handed to the send endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Reasons a shipment exception can be reported for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExceptionReason {
    #[default]
    VesselDelay,
    CustomsHold,
    Strike,
}

impl ExceptionReason {
    pub fn all() -> [ExceptionReason; 3] {
        [
            ExceptionReason::VesselDelay,
            ExceptionReason::CustomsHold,
            ExceptionReason::Strike,
        ]
    }

    /// Value the exception endpoint expects
    pub fn wire_value(&self) -> &'static str {
        match self {
            ExceptionReason::VesselDelay => "Vessel Delay",
            ExceptionReason::CustomsHold => "Customs Hold",
            ExceptionReason::Strike => "Strike",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExceptionReason::VesselDelay => "Vessel Delay (Port Congestion)",
            ExceptionReason::CustomsHold => "Customs Inspection Hold",
            ExceptionReason::Strike => "Labor Strike at Terminal",
        }
    }

    pub fn next(self) -> ExceptionReason {
        match self {
            ExceptionReason::VesselDelay => ExceptionReason::CustomsHold,
            ExceptionReason::CustomsHold => ExceptionReason::Strike,
            ExceptionReason::Strike => ExceptionReason::VesselDelay,
        }
    }

    pub fn previous(self) -> ExceptionReason {
        match self {
            ExceptionReason::VesselDelay => ExceptionReason::Strike,
            ExceptionReason::CustomsHold => ExceptionReason::VesselDelay,
            ExceptionReason::Strike => ExceptionReason::CustomsHold,
        }
    }
}

/// Duties and taxes estimate for a quote under one HS code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandedCostEstimate {
    #[serde(default)]
    pub estimated_duties: f64,
    #[serde(default)]
    pub estimated_taxes: f64,
    #[serde(default)]
    pub total_landed_cost: f64,
    #[serde(default)]
    pub hs_description: String,
}

/// Acknowledgement from the ERP gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErpReceipt {
    #[serde(default)]
    pub erp_reference: String,
    #[serde(default)]
    pub details: String,
}
