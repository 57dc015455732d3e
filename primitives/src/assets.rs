use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

/// Single source of truth for asset types across pallets.
///
/// - `Native`: The system's native token (managed by pallet-balances).
/// - `Local(u32)`: Local assets (managed by pallet-assets).
/// - `Foreign(u32)`: Foreign assets (managed by pallet-assets, XCM mapped).
#[derive(
  Clone,
  Copy,
  Debug,
  Decode,
  DecodeWithMemTracking,
  Default,
  Encode,
  Eq,
  MaxEncodedLen,
  Ord,
  PartialEq,
  PartialOrd,
  TypeInfo,
  Serialize,
  Deserialize,
)]
pub enum AssetKind {
  /// Native token managed by pallet-balances
  #[default]
  Native,
  /// Local asset managed by pallet-assets
  Local(u32),
  /// Foreign asset managed by pallet-assets via XCM mapping
  Foreign(u32),
}

impl From<u32> for AssetKind {
  fn from(asset_id: u32) -> Self {
    AssetKind::Local(asset_id)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn native_is_default() {
    assert_eq!(AssetKind::default(), AssetKind::Native);
  }

  #[test]
  fn ids_convert_to_local_assets() {
    let asset: AssetKind = 7u32.into();
    assert_eq!(asset, AssetKind::Local(7));
    assert_ne!(AssetKind::Foreign(7), asset);
  }

  #[test]
  fn scale_encoding_is_compact() {
    assert_eq!(AssetKind::Native.encode(), vec![0]);
    assert_eq!(AssetKind::Local(1).encode(), vec![1, 1, 0, 0, 0]);
    assert_eq!(AssetKind::max_encoded_len(), 5);
  }
}
