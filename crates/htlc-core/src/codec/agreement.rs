//! # Agreement Encoding
//!
//! Canonical, shape-tagged encoding of exchange agreements.
//!
//! Wire body: `{ shape, asset_type, asset_id?, amount?, opaque_data?, locker?, recipient }`.
//! Optional fields are present exactly when the shape uses them; the
//! decoder rejects any body where they disagree with the shape tag.

use super::envelope::{open, seal, PayloadKind};
use crate::domain::{AssetShape, CodecError, ExchangeAgreement, HtlcError};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
struct AgreementWire {
    shape: u8,
    asset_type: String,
    asset_id: Option<String>,
    amount: Option<u64>,
    opaque_data: Option<Vec<u8>>,
    locker: Option<String>,
    recipient: String,
}

impl From<&ExchangeAgreement> for AgreementWire {
    fn from(agreement: &ExchangeAgreement) -> Self {
        match agreement {
            ExchangeAgreement::Unique {
                asset_type,
                asset_id,
                locker,
                recipient,
            } => Self {
                shape: AssetShape::Unique.tag(),
                asset_type: asset_type.clone(),
                asset_id: Some(asset_id.clone()),
                amount: None,
                opaque_data: None,
                locker: Some(locker.clone()),
                recipient: recipient.clone(),
            },
            ExchangeAgreement::Fungible {
                asset_type,
                amount,
                locker,
                recipient,
            } => Self {
                shape: AssetShape::Fungible.tag(),
                asset_type: asset_type.clone(),
                asset_id: None,
                amount: Some(*amount),
                opaque_data: None,
                locker: Some(locker.clone()),
                recipient: recipient.clone(),
            },
            ExchangeAgreement::Hybrid {
                asset_type,
                asset_id,
                opaque_data,
                amount,
                recipient,
            } => Self {
                shape: AssetShape::Hybrid.tag(),
                asset_type: asset_type.clone(),
                asset_id: Some(asset_id.clone()),
                amount: Some(*amount),
                opaque_data: Some(opaque_data.clone()),
                locker: None,
                recipient: recipient.clone(),
            },
        }
    }
}

impl TryFrom<AgreementWire> for ExchangeAgreement {
    type Error = CodecError;

    fn try_from(wire: AgreementWire) -> Result<Self, Self::Error> {
        let AgreementWire {
            shape,
            asset_type,
            asset_id,
            amount,
            opaque_data,
            locker,
            recipient,
        } = wire;

        let shape = AssetShape::from_tag(shape)
            .ok_or_else(|| CodecError::ShapeMismatch(format!("unknown shape tag {shape}")))?;

        let agreement = match (shape, asset_id, amount, opaque_data, locker) {
            (AssetShape::Unique, Some(asset_id), None, None, Some(locker)) => {
                ExchangeAgreement::Unique {
                    asset_type,
                    asset_id,
                    locker,
                    recipient,
                }
            }
            (AssetShape::Fungible, None, Some(amount), None, Some(locker)) => {
                ExchangeAgreement::Fungible {
                    asset_type,
                    amount,
                    locker,
                    recipient,
                }
            }
            (AssetShape::Hybrid, Some(asset_id), Some(amount), Some(opaque_data), None) => {
                ExchangeAgreement::Hybrid {
                    asset_type,
                    asset_id,
                    opaque_data,
                    amount,
                    recipient,
                }
            }
            (shape, ..) => {
                return Err(CodecError::ShapeMismatch(format!(
                    "fields do not match {shape} shape"
                )))
            }
        };
        Ok(agreement)
    }
}

/// Encode any agreement after checking its shape's required fields.
pub fn encode_agreement(agreement: &ExchangeAgreement) -> Result<Vec<u8>, HtlcError> {
    agreement.validate()?;
    Ok(seal(
        PayloadKind::ExchangeAgreement,
        &AgreementWire::from(agreement),
    )?)
}

/// Encode a unique-asset agreement.
pub fn encode_unique_asset(
    asset_type: &str,
    asset_id: &str,
    recipient: &str,
    locker: &str,
) -> Result<Vec<u8>, HtlcError> {
    encode_agreement(&ExchangeAgreement::unique(
        asset_type, asset_id, recipient, locker,
    ))
}

/// Encode a fungible-amount agreement.
pub fn encode_fungible_asset(
    asset_type: &str,
    amount: u64,
    locker: &str,
    recipient: &str,
) -> Result<Vec<u8>, HtlcError> {
    encode_agreement(&ExchangeAgreement::fungible(
        asset_type, amount, locker, recipient,
    ))
}

/// Encode a hybrid agreement carrying opaque asset data.
pub fn encode_hybrid_asset(
    asset_type: &str,
    asset_id: &str,
    opaque_data: &[u8],
    amount: u64,
    recipient: &str,
) -> Result<Vec<u8>, HtlcError> {
    encode_agreement(&ExchangeAgreement::hybrid(
        asset_type,
        asset_id,
        opaque_data.to_vec(),
        amount,
        recipient,
    ))
}

/// Decode an agreement payload.
pub fn decode_agreement(bytes: &[u8]) -> Result<ExchangeAgreement, HtlcError> {
    let wire: AgreementWire = open(PayloadKind::ExchangeAgreement, bytes)?;
    let agreement = ExchangeAgreement::try_from(wire)?;
    agreement.validate()?;
    Ok(agreement)
}
