// Copyright 2025 metalstack.cloud Team.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};

#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Coupon {
    pub id: String,
    pub name: String,
    /// Amount in the smallest currency unit (cents)
    #[serde_as(as = "PickFirst<(DisplayFromStr, _)>")]
    pub amount_off: i64,
    pub currency: String,
    #[serde_as(as = "PickFirst<(DisplayFromStr, _)>")]
    pub duration_in_month: i64,
    #[serde_as(as = "PickFirst<(DisplayFromStr, _)>")]
    pub times_redeemed: i64,
    #[serde_as(as = "PickFirst<(DisplayFromStr, _)>")]
    pub max_redemptions: i64,
    #[serde_as(as = "PickFirst<(DisplayFromStr, _)>")]
    pub amount_left: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redeem_by: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Coupon {
    /// Amount formatted with its currency, e.g. `50.00 EUR`.
    pub fn amount(&self) -> String {
        self.money(self.amount_off)
    }

    /// Remaining credit of the coupon.
    pub fn left(&self) -> String {
        self.money(self.amount_left)
    }

    fn money(&self, cents: i64) -> String {
        let sign = if cents < 0 { "-" } else { "" };
        let abs = cents.unsigned_abs();
        format!(
            "{}{}.{:02} {}",
            sign,
            abs / 100,
            abs % 100,
            self.currency.to_uppercase()
        )
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CouponListResponse {
    pub coupons: Vec<Coupon>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coupon_amount() {
        let coupon = Coupon {
            amount_off: 5005,
            currency: "eur".to_string(),
            ..Default::default()
        };
        assert_eq!(coupon.amount(), "50.05 EUR");
    }

    #[test]
    fn test_coupon_from_protojson() {
        let coupon: Coupon =
            serde_json::from_str(r#"{"id":"c","amountOff":"10000","maxRedemptions":"5"}"#).unwrap();
        assert_eq!(coupon.amount_off, 10_000);
        assert_eq!(coupon.max_redemptions, 5);
    }
}
