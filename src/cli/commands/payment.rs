//! Payment commands

use crate::cli::genericcli::{
    non_empty, CrudResource, DescribeArgs, GenericCli, NotSupported, SortArgs, SortKeys,
};
use crate::cli::session::Session;
use crate::domain::api::Coupon;
use crate::infrastructure::api::ApiClient;
use crate::shared::error::{CliError, Result as CliResult, CODE_NOT_FOUND};
use async_trait::async_trait;
use clap::{Parser, Subcommand};

pub struct CouponResource {
    client: ApiClient,
}

impl CouponResource {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CrudResource for CouponResource {
    type Entity = Coupon;
    type Create = NotSupported;
    type Update = NotSupported;
    type Filter = ();

    const KIND: &'static str = "coupon";

    async fn list(&self, _filter: &()) -> CliResult<Vec<Coupon>> {
        self.client.coupon_list().await
    }

    /// There is no single-coupon call, the coupon is looked up in the list.
    async fn get(&self, id: &str) -> CliResult<Coupon> {
        self.client
            .coupon_list()
            .await?
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| CliError::api(CODE_NOT_FOUND, format!("coupon {} not found", id)))
    }

    fn id(entity: &Coupon) -> Option<String> {
        non_empty(&entity.id)
    }

    fn sort_keys(&self) -> SortKeys<Coupon> {
        SortKeys::new()
            .key("id", |a: &Coupon, b: &Coupon| a.id.cmp(&b.id))
            .key("name", |a: &Coupon, b: &Coupon| a.name.cmp(&b.name))
            .key("amount", |a: &Coupon, b: &Coupon| a.amount_off.cmp(&b.amount_off))
            .key("redeem-by", |a: &Coupon, b: &Coupon| a.redeem_by.cmp(&b.redeem_by))
            .defaults(&["id"])
    }
}

#[derive(Subcommand, Debug)]
pub enum PaymentCommand {
    /// Coupons of your tenant
    #[command(subcommand)]
    Coupon(CouponCommand),
}

#[derive(Subcommand, Debug)]
pub enum CouponCommand {
    /// List coupons
    List(CouponListCommand),

    /// Show a coupon
    Describe(DescribeArgs),
}

#[derive(Parser, Debug, Clone, Default)]
pub struct CouponListCommand {
    #[command(flatten)]
    pub sort: SortArgs,
}

impl PaymentCommand {
    pub async fn execute(&self, session: &Session) -> anyhow::Result<()> {
        let PaymentCommand::Coupon(cmd) = self;
        let cli = GenericCli::new(CouponResource::new(session.client.clone()), &session.printer);
        match cmd {
            CouponCommand::List(cmd) => cli.list_and_print(&(), &cmd.sort).await,
            CouponCommand::Describe(args) => cli.describe_and_print(&args.id).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::api::Transport;
    use serde_json::{json, Value};
    use std::sync::Arc;

    struct Coupons;

    #[async_trait]
    impl Transport for Coupons {
        async fn unary(&self, _procedure: &str, _request: Value) -> CliResult<Value> {
            Ok(json!({"coupons": [{"id": "c-1", "name": "welcome"}, {"id": "c-2"}]}))
        }
    }

    #[tokio::test]
    async fn test_get_finds_coupon_in_list() {
        let resource = CouponResource::new(ApiClient::with_transport(Arc::new(Coupons)));
        assert_eq!(resource.get("c-1").await.unwrap().name, "welcome");

        let err = resource.get("c-3").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
