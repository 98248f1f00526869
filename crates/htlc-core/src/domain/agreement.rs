//! # Exchange Agreements
//!
//! What is being locked, and between whom.
//!
//! An agreement has exactly one of three shapes. Each variant carries only
//! the fields that apply to it, so a unique asset can never accidentally
//! carry an amount and a fungible asset can never carry an asset id.

use super::errors::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest hybrid opaque payload accepted, in bytes. Keeps every encoded
/// agreement decodable.
pub const MAX_OPAQUE_DATA_LEN: usize = 32 * 1024;

/// Shape of an exchange agreement. The discriminant is the wire tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetShape {
    /// Non-fungible asset identified by id.
    Unique,
    /// Fungible amount of an asset type.
    Fungible,
    /// Identified asset with an amount and opaque asset data.
    Hybrid,
}

impl AssetShape {
    /// Tag used on the wire.
    pub const fn tag(self) -> u8 {
        match self {
            Self::Unique => 0,
            Self::Fungible => 1,
            Self::Hybrid => 2,
        }
    }

    /// Shape for a wire tag.
    pub fn from_tag(tag: u8) -> Option<Self> {
        [Self::Unique, Self::Fungible, Self::Hybrid]
            .into_iter()
            .find(|shape| shape.tag() == tag)
    }
}

impl fmt::Display for AssetShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unique => "unique",
            Self::Fungible => "fungible",
            Self::Hybrid => "hybrid",
        };
        f.write_str(name)
    }
}

/// Agreement between locker and recipient on the locked asset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExchangeAgreement {
    /// A single non-fungible asset.
    Unique {
        /// Free-form asset type tag.
        asset_type: String,
        /// Asset identifier.
        asset_id: String,
        /// Identity locking the asset.
        locker: String,
        /// Identity allowed to claim.
        recipient: String,
    },
    /// An amount of a fungible asset.
    Fungible {
        /// Free-form asset type tag.
        asset_type: String,
        /// Units locked.
        amount: u64,
        /// Identity locking the asset.
        locker: String,
        /// Identity allowed to claim.
        recipient: String,
    },
    /// An identified asset with an amount and opaque data.
    ///
    /// Carries no locker; the locking party is named by the lock
    /// submission itself.
    Hybrid {
        /// Free-form asset type tag.
        asset_type: String,
        /// Asset identifier.
        asset_id: String,
        /// Opaque asset data.
        opaque_data: Vec<u8>,
        /// Units locked.
        amount: u64,
        /// Identity allowed to claim.
        recipient: String,
    },
}

impl ExchangeAgreement {
    /// Unique-asset agreement.
    pub fn unique(
        asset_type: impl Into<String>,
        asset_id: impl Into<String>,
        recipient: impl Into<String>,
        locker: impl Into<String>,
    ) -> Self {
        Self::Unique {
            asset_type: asset_type.into(),
            asset_id: asset_id.into(),
            locker: locker.into(),
            recipient: recipient.into(),
        }
    }

    /// Fungible-amount agreement.
    pub fn fungible(
        asset_type: impl Into<String>,
        amount: u64,
        locker: impl Into<String>,
        recipient: impl Into<String>,
    ) -> Self {
        Self::Fungible {
            asset_type: asset_type.into(),
            amount,
            locker: locker.into(),
            recipient: recipient.into(),
        }
    }

    /// Hybrid agreement with opaque data.
    pub fn hybrid(
        asset_type: impl Into<String>,
        asset_id: impl Into<String>,
        opaque_data: Vec<u8>,
        amount: u64,
        recipient: impl Into<String>,
    ) -> Self {
        Self::Hybrid {
            asset_type: asset_type.into(),
            asset_id: asset_id.into(),
            opaque_data,
            amount,
            recipient: recipient.into(),
        }
    }

    /// Active shape.
    pub fn shape(&self) -> AssetShape {
        match self {
            Self::Unique { .. } => AssetShape::Unique,
            Self::Fungible { .. } => AssetShape::Fungible,
            Self::Hybrid { .. } => AssetShape::Hybrid,
        }
    }

    /// Asset type tag.
    pub fn asset_type(&self) -> &str {
        match self {
            Self::Unique { asset_type, .. }
            | Self::Fungible { asset_type, .. }
            | Self::Hybrid { asset_type, .. } => asset_type.as_str(),
        }
    }

    /// Recipient identity.
    pub fn recipient(&self) -> &str {
        match self {
            Self::Unique { recipient, .. }
            | Self::Fungible { recipient, .. }
            | Self::Hybrid { recipient, .. } => recipient.as_str(),
        }
    }

    /// Locker identity, for shapes that record one.
    pub fn locker(&self) -> Option<&str> {
        match self {
            Self::Unique { locker, .. } | Self::Fungible { locker, .. } => {
                Some(locker.as_str())
            }
            Self::Hybrid { .. } => None,
        }
    }

    /// Check that every field the active shape requires is present.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.recipient().trim().is_empty() {
            return Err(ValidationError::MissingRecipient);
        }
        match self {
            Self::Unique {
                asset_id, locker, ..
            } => {
                require_non_empty("asset_id", asset_id, self.shape())?;
                require_non_empty("locker", locker, self.shape())
            }
            Self::Fungible { amount, locker, .. } => {
                require_positive(*amount, self.shape())?;
                require_non_empty("locker", locker, self.shape())
            }
            Self::Hybrid {
                asset_id,
                amount,
                opaque_data,
                ..
            } => {
                require_non_empty("asset_id", asset_id, self.shape())?;
                require_positive(*amount, self.shape())?;
                if opaque_data.len() > MAX_OPAQUE_DATA_LEN {
                    return Err(ValidationError::MalformedAgreement(format!(
                        "opaque data is {} bytes, limit is {MAX_OPAQUE_DATA_LEN}",
                        opaque_data.len()
                    )));
                }
                Ok(())
            }
        }
    }
}

fn require_non_empty(field: &str, value: &str, shape: AssetShape) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MalformedAgreement(format!(
            "{shape} agreement requires a non-empty {field}"
        )));
    }
    Ok(())
}

fn require_positive(amount: u64, shape: AssetShape) -> Result<(), ValidationError> {
    if amount == 0 {
        return Err(ValidationError::MalformedAgreement(format!(
            "{shape} agreement requires a positive amount"
        )));
    }
    Ok(())
}

/// Decode hex-encoded asset data into opaque bytes.
///
/// Accepts an optional `0x` prefix.
pub fn hex_opaque_data(data: &str) -> Result<Vec<u8>, ValidationError> {
    let trimmed = data.strip_prefix("0x").unwrap_or(data);
    hex::decode(trimmed)
        .map_err(|e| ValidationError::MalformedAgreement(format!("opaque data is not hex: {e}")))
}
