#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use susu::domain::error::DomainError;
use susu::{
    AccountStatus, MarkPayment, NewSavingsAccount, NewTargetSavings, NewUnit, PaymentMethod, Role,
    SavingsType, SusuModule,
};

struct Parties {
    module: SusuModule,
    agent: i32,
    customer: i32,
    business: i32,
}

/// An agent's business with one linked customer.
async fn parties() -> Parties {
    let (_db, module) = common::setup().await;
    let agent = common::seed_user(&module, "agent", Role::Agent).await;
    let customer = common::seed_user(&module, "cust", Role::Customer).await;
    let business = common::seed_business(&module, agent.id, "Tema Susu").await;
    common::link(&module, customer.id, business.id).await;

    Parties {
        module,
        agent: agent.id,
        customer: customer.id,
        business: business.id,
    }
}

impl Parties {
    fn daily(&self, unit_id: Option<i32>) -> NewSavingsAccount {
        NewSavingsAccount {
            customer_id: self.customer,
            business_id: self.business,
            unit_id,
            daily_amount: 1_000,
            duration_months: 1,
            start_date: common::date(2024, 2, 1),
            commission_days: None,
            commission_amount: None,
        }
    }

    async fn unit(&self, business_id: i32, name: &str) -> i32 {
        self.module
            .services()
            .businesses
            .add_unit(
                &common::as_actor(self.agent),
                business_id,
                NewUnit {
                    name: name.to_owned(),
                    location: None,
                },
            )
            .await
            .unwrap()
            .id
    }
}

struct Fixture {
    module: SusuModule,
    agent: i32,
    account: i32,
}

async fn open_account(commission_days: Option<i32>) -> Fixture {
    let p = parties().await;
    let account = p
        .module
        .services()
        .savings
        .create_savings_account(
            &common::as_actor(p.agent),
            NewSavingsAccount {
                commission_days,
                ..p.daily(None)
            },
        )
        .await
        .unwrap();

    Fixture {
        module: p.module,
        agent: p.agent,
        account: account.id,
    }
}

fn cash() -> MarkPayment {
    MarkPayment {
        payment_method: PaymentMethod::Cash,
        payment_reference: None,
    }
}

#[tokio::test]
async fn opening_an_account_schedules_one_marking_per_day() {
    let fx = open_account(None).await;
    let svc = fx.module.services();
    let ctx = common::as_actor(fx.agent);

    let account = svc.savings.get_savings_account(&ctx, fx.account).await.unwrap();
    assert_eq!(account.end_date, common::date(2024, 2, 29));
    assert_eq!(account.tracking_number.len(), 10);
    assert_eq!(account.commission_days, 30);
    assert_eq!(account.commission_amount, 1_000);
    assert_eq!(account.target_amount, Some(29_000));
    assert_eq!(account.status, AccountStatus::NotStarted);
    assert_eq!(account.audit.created_by, Some(fx.agent));

    let markings = svc.savings.list_markings(&ctx, fx.account).await.unwrap();
    assert_eq!(markings.len(), 29);
    assert_eq!(markings[0].marked_date, common::date(2024, 2, 1));
    assert_eq!(markings[28].marked_date, common::date(2024, 2, 29));
    assert!(markings.iter().all(|m| m.status == "pending" && m.amount == 1_000));

    // 29 days fit in one 30-day period
    assert_eq!(svc.savings.total_commission(&ctx, fx.account).await.unwrap(), 1_000);
}

#[tokio::test]
async fn paying_marks_the_day_and_accrues_commission_on_period_start() {
    let fx = open_account(Some(7)).await;
    let svc = fx.module.services();
    let ctx = common::as_actor(fx.agent);

    let first = svc
        .savings
        .mark_payment(&ctx, fx.account, common::date(2024, 2, 1), cash())
        .await
        .unwrap();
    assert_eq!(first.status, "paid");
    assert_eq!(first.marked_by_id, Some(fx.agent));
    assert_eq!(first.payment_method, Some(PaymentMethod::Cash));
    assert_eq!(first.audit.updated_by, Some(fx.agent));

    svc.savings
        .mark_payment(&ctx, fx.account, common::date(2024, 2, 2), cash())
        .await
        .unwrap();
    svc.savings
        .mark_payment(&ctx, fx.account, common::date(2024, 2, 8), cash())
        .await
        .unwrap();

    let commissions = svc.savings.list_commissions(&ctx, fx.account).await.unwrap();
    let dates: Vec<_> = commissions.iter().map(|c| c.commission_date).collect();
    assert_eq!(dates, vec![common::date(2024, 2, 1), common::date(2024, 2, 8)]);
    assert!(commissions.iter().all(|c| c.agent_id == fx.agent && c.amount == 1_000));
}

#[tokio::test]
async fn paying_twice_is_a_conflict() {
    let fx = open_account(None).await;
    let svc = fx.module.services();
    let ctx = common::as_actor(fx.agent);
    let day = common::date(2024, 2, 10);

    svc.savings.mark_payment(&ctx, fx.account, day, cash()).await.unwrap();
    let err = svc
        .savings
        .mark_payment(&ctx, fx.account, day, cash())
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Conflict { .. }));
}

#[tokio::test]
async fn paying_outside_the_schedule_is_rejected() {
    let fx = open_account(None).await;
    let svc = fx.module.services();

    let err = svc
        .savings
        .mark_payment(&common::as_actor(fx.agent), fx.account, common::date(2024, 3, 1), cash())
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "date"));
}

#[tokio::test]
async fn system_payment_accrues_no_commission() {
    let fx = open_account(None).await;
    let svc = fx.module.services();

    svc.savings
        .mark_payment(&common::system(), fx.account, common::date(2024, 2, 1), cash())
        .await
        .unwrap();

    let commissions = svc.savings.list_commissions(&common::system(), fx.account).await.unwrap();
    assert!(commissions.is_empty());
}

#[tokio::test]
async fn marking_status_is_checked_against_the_domain() {
    let fx = open_account(None).await;
    let svc = fx.module.services();
    let ctx = common::as_actor(fx.agent);
    let marking = svc.savings.list_markings(&ctx, fx.account).await.unwrap()[3].clone();

    let err = svc
        .savings
        .update_marking_status(&ctx, marking.id, "lost")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "status"));

    let paid = svc
        .savings
        .update_marking_status(&ctx, marking.id, "paid")
        .await
        .unwrap();
    assert_eq!(paid.status, "paid");
    assert_eq!(paid.audit.updated_by, Some(fx.agent));
}

#[tokio::test]
async fn only_customers_can_own_accounts() {
    let p = parties().await;

    let err = p
        .module
        .services()
        .savings
        .create_savings_account(
            &common::as_actor(p.agent),
            NewSavingsAccount {
                customer_id: p.agent,
                ..p.daily(None)
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "customer_id"));
}

#[tokio::test]
async fn unit_must_belong_to_the_business() {
    let p = parties().await;
    let other = common::seed_business(&p.module, p.agent, "Kasoa").await;
    let foreign_unit = p.unit(other.id, "Kasoa stall").await;
    let svc = p.module.services();
    let ctx = common::as_actor(p.agent);

    for unit_id in [foreign_unit, 9_999] {
        let err = svc
            .savings
            .create_savings_account(&ctx, p.daily(Some(unit_id)))
            .await
            .unwrap_err();
        assert!(
            matches!(err, DomainError::Validation { ref field, .. } if field == "unit_id"),
            "unit {unit_id}: {err:?}"
        );
    }

    let own_unit = p.unit(p.business, "Tema stall").await;
    let account = svc
        .savings
        .create_savings_account(&ctx, p.daily(Some(own_unit)))
        .await
        .unwrap();
    assert_eq!(account.unit_id, Some(own_unit));
    let markings = svc.savings.list_markings(&ctx, account.id).await.unwrap();
    assert!(markings.iter().all(|m| m.unit_id == Some(own_unit)));
}

#[tokio::test]
async fn customer_must_be_a_member_of_the_business() {
    let p = parties().await;
    let svc = p.module.services();
    let stranger = common::seed_user(&p.module, "walkin", Role::Customer).await;

    let err = svc
        .savings
        .create_savings_account(
            &common::as_actor(p.agent),
            NewSavingsAccount {
                customer_id: stranger.id,
                ..p.daily(None)
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "customer_id"));
    let linked = svc
        .memberships
        .list_business_ids(&common::system(), stranger.id)
        .await
        .unwrap();
    assert!(linked.is_empty());
}

#[tokio::test]
async fn paying_every_marking_completes_the_account() {
    let fx = open_account(None).await;
    let svc = fx.module.services();
    let ctx = common::as_actor(fx.agent);
    let markings = svc.savings.list_markings(&ctx, fx.account).await.unwrap();

    svc.savings
        .mark_payment(&ctx, fx.account, markings[0].marked_date, cash())
        .await
        .unwrap();
    let account = svc.savings.get_savings_account(&ctx, fx.account).await.unwrap();
    assert_eq!(account.status, AccountStatus::InProgress);
    assert_eq!(account.audit.updated_by, Some(fx.agent));

    for marking in &markings[1..] {
        svc.savings
            .mark_payment(&ctx, fx.account, marking.marked_date, cash())
            .await
            .unwrap();
    }
    let account = svc.savings.get_savings_account(&ctx, fx.account).await.unwrap();
    assert_eq!(account.status, AccountStatus::Completed);

    let err = svc
        .savings
        .update_marking_status(&ctx, markings[0].id, "pending")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict { .. }));
}

#[tokio::test]
async fn ended_account_takes_no_more_payments() {
    let fx = open_account(None).await;
    let svc = fx.module.services();
    let ctx = common::as_actor(fx.agent);

    let ended = svc.savings.end_savings_account(&ctx, fx.account).await.unwrap();
    assert_eq!(ended.status, AccountStatus::Completed);
    assert_eq!(ended.audit.updated_by, Some(fx.agent));

    let err = svc
        .savings
        .mark_payment(&ctx, fx.account, common::date(2024, 2, 3), cash())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict { .. }));

    let err = svc.savings.end_savings_account(&ctx, fx.account).await.unwrap_err();
    assert!(matches!(err, DomainError::Conflict { .. }));

    let err = svc.savings.end_savings_account(&ctx, 4_040).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn target_savings_spreads_the_target_over_the_days() {
    let p = parties().await;
    let svc = p.module.services();
    let ctx = common::as_actor(p.agent);

    let account = svc
        .savings
        .create_target_savings(
            &ctx,
            NewTargetSavings {
                customer_id: p.customer,
                business_id: p.business,
                unit_id: None,
                target_amount: 10_000,
                start_date: common::date(2024, 2, 25),
                end_date: common::date(2024, 3, 5),
                commission_days: Some(5),
                commission_amount: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(account.savings_type, SavingsType::Target);
    assert_eq!(account.target_amount, Some(10_000));
    // Feb 25 to Mar 5 in a leap year is 10 days over two calendar months
    assert_eq!(account.daily_amount, 1_000);
    assert_eq!(account.duration_months, 2);
    assert_eq!(account.commission_amount, 1_000);
    assert_eq!(account.status, AccountStatus::NotStarted);

    let markings = svc.savings.list_markings(&ctx, account.id).await.unwrap();
    assert_eq!(markings.len(), 10);
    assert_eq!(markings.last().unwrap().marked_date, common::date(2024, 3, 5));
    assert_eq!(svc.savings.total_commission(&ctx, account.id).await.unwrap(), 2_000);
}
