use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Seller lifecycle. Only `Approved` sellers can sign in or show up in public listings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum SellerStatus {
    Pending,
    Approved,
    Cancelled,
}

impl SellerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SellerStatus::Pending => "PENDING",
            SellerStatus::Approved => "APPROVED",
            SellerStatus::Cancelled => "CANCELLED",
        }
    }

    /// A pending seller is decided exactly once; decided sellers never move again.
    pub fn can_transition_to(&self, next: SellerStatus) -> bool {
        matches!(
            (self, next),
            (SellerStatus::Pending, SellerStatus::Approved) | (SellerStatus::Pending, SellerStatus::Cancelled)
        )
    }
}

impl fmt::Display for SellerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SellerStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PENDING" => Ok(SellerStatus::Pending),
            "APPROVED" => Ok(SellerStatus::Approved),
            "CANCELLED" => Ok(SellerStatus::Cancelled),
            _ => Err(AppError::invalid(
                "status",
                format!("invalid seller status: {} (expected PENDING, APPROVED or CANCELLED)", s),
            )),
        }
    }
}

impl TryFrom<String> for SellerStatus {
    type Error = AppError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[derive(Clone, Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Seller {
    pub id: i64,
    pub store_name: String,
    pub description: String,
    pub pic_name: String,
    pub pic_hp: String,
    pub pic_email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub address: String,
    #[serde(rename = "picRT")]
    pub pic_rt: i32,
    #[serde(rename = "picRW")]
    pub pic_rw: i32,
    pub pic_province: String,
    pub pic_city: String,
    pub pic_district: String,
    pub pic_village: String,
    #[serde(rename = "picNoKTP")]
    pub pic_no_ktp: String,
    #[serde(rename = "picUrlKTP")]
    pub pic_url_ktp: String,
    pub pic_url_photo: String,
    #[sqlx(try_from = "String")]
    pub status: SellerStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub verified_at: Option<DateTime<Utc>>,
}

/// Registration payload.
#[derive(Clone, Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewSeller {
    pub store_name: String,
    pub description: String,
    pub pic_name: String,
    pub pic_hp: String,
    pub pic_email: String,
    pub password: String,
    pub address: String,
    #[serde(rename = "picRT")]
    pub pic_rt: i32,
    #[serde(rename = "picRW")]
    pub pic_rw: i32,
    pub pic_province: String,
    pub pic_city: String,
    pub pic_district: String,
    pub pic_village: String,
    #[serde(rename = "picNoKTP")]
    pub pic_no_ktp: String,
    #[serde(rename = "picUrlKTP")]
    pub pic_url_ktp: String,
    pub pic_url_photo: String,
}

/// Profile fields a seller may change. Email, identity card and status stay fixed.
#[derive(Clone, Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SellerProfileUpdate {
    pub store_name: String,
    pub description: String,
    pub pic_name: String,
    pub pic_hp: String,
    pub address: String,
    #[serde(rename = "picRT")]
    pub pic_rt: i32,
    #[serde(rename = "picRW")]
    pub pic_rw: i32,
    pub pic_province: String,
    pub pic_city: String,
    pub pic_district: String,
    pub pic_village: String,
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Seller sign-in: `identifier` is the PIC e-mail or phone number.
#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct SellerLogin {
    pub identifier: String,
    pub password: String,
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct StatusUpdate {
    pub status: SellerStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_pending_sellers_are_decided() {
        use SellerStatus::*;
        assert!(Pending.can_transition_to(Approved));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(!Pending.can_transition_to(Pending));
        assert!(!Approved.can_transition_to(Cancelled));
        assert!(!Approved.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Approved));
        assert!(!Cancelled.can_transition_to(Pending));
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("approved".parse::<SellerStatus>().unwrap(), SellerStatus::Approved);
        assert_eq!("CANCELLED".parse::<SellerStatus>().unwrap(), SellerStatus::Cancelled);
        assert!("REJECTED".parse::<SellerStatus>().is_err());
    }

    #[test]
    fn serializes_uppercase() {
        assert_eq!(serde_json::to_value(SellerStatus::Pending).unwrap(), "PENDING");
        let s: StatusUpdate = serde_json::from_str(r#"{"status":"APPROVED"}"#).unwrap();
        assert_eq!(s.status, SellerStatus::Approved);
    }
}
