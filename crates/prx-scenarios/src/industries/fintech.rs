//! FinTech: an automated trading platform.

use serde_json::json;

use prx_contracts::{
    error::PrxResult,
    outcome::Outcome::{Allowed, Blocked, Escalated},
    scenario::{HistoricalStats, Industry, Scenario},
};

use super::{policy, template};

pub fn scenario() -> PrxResult<Scenario> {
    let actions = vec![
        template(
            "transaction.create",
            "trading-bot-v2",
            json!({ "amount": 4200, "currency": "USD", "instrument": "AAPL", "side": "BUY" }),
            &[Allowed, Allowed, Allowed, Allowed, Blocked],
            "TRANSACTION_LIMIT",
            (0.8, 1.6),
        )?,
        template(
            "position.open",
            "trading-bot-v2",
            json!({ "symbol": "TSLA", "notional": 72000, "side": "LONG", "leverage": 2 }),
            &[Blocked, Blocked, Escalated, Allowed],
            "MAX_POSITION_SIZE",
            (1.1, 2.2),
        )?,
        template(
            "data.export",
            "risk-analyzer",
            json!({ "dataset": "trade_history", "rows": 15000, "format": "CSV", "destination": "s3://reports" }),
            &[Blocked, Allowed, Allowed],
            "DATA_EXPORT_LIMIT",
            (0.9, 1.8),
        )?,
        template(
            "margin.adjust",
            "portfolio-manager",
            json!({ "account": "ACC-00291", "adjustment": -15000, "reason": "rebalance" }),
            &[Allowed, Allowed, Escalated],
            "MARGIN_CONTROL",
            (0.7, 1.4),
        )?,
        template(
            "account.read",
            "risk-analyzer",
            json!({ "accountId": "ACC-00184", "fields": ["balance", "positions"] }),
            &[Allowed, Allowed, Allowed, Allowed],
            "KYC_REQUIRED",
            (0.5, 1.0),
        )?,
        template(
            "trade.cancel",
            "trading-bot-v2",
            json!({ "orderId": "ORD-88234", "reason": "risk_limit_breach" }),
            &[Allowed, Allowed, Allowed],
            "TRADING_HOURS",
            (0.6, 1.2),
        )?,
    ];

    let policies = vec![
        policy(
            "MAX_POSITION_SIZE",
            "Blocks any position with notional value exceeding $50,000 without senior trader approval.",
            Blocked,
            &["notional > 50000", "approval_level < SENIOR"],
            r#"policy MAX_POSITION_SIZE {
  version: "1.3.0"
  applies_to: [position.open, position.increase]

  rule block_oversized_positions {
    when {
      action.payload.notional > 50000
      AND context.approval_level < "SENIOR"
    }
    effect: BLOCK
    reason: "Position size exceeds single-trade limit without senior approval"
    notify: [risk-desk@firm.com]
  }

  rule escalate_large_positions {
    when {
      action.payload.notional >= 30000
      AND action.payload.notional <= 50000
    }
    effect: ESCALATE
    escalate_to: "risk-manager"
    sla_minutes: 15
  }
}"#,
        ),
        policy(
            "TRADING_HOURS",
            "Restricts automated trading to NYSE market hours (9:30am to 4:00pm ET, weekdays).",
            Blocked,
            &["time NOT IN 09:30-16:00 ET", "day IN [MON-FRI]"],
            r#"policy TRADING_HOURS {
  version: "2.1.0"
  applies_to: [transaction.create, position.open]

  rule market_hours_only {
    when {
      context.timestamp.hour NOT IN [9..16]
      OR context.timestamp.weekday IN ["SAT", "SUN"]
    }
    effect: BLOCK
    reason: "Automated trades are only permitted during NYSE market hours"
  }

  rule pre_market_escalate {
    when {
      context.timestamp.hour IN [8, 9]
      AND context.timestamp.weekday NOT IN ["SAT", "SUN"]
    }
    effect: ESCALATE
    escalate_to: "trading-desk"
    sla_minutes: 5
  }
}"#,
        ),
        policy(
            "TRANSACTION_LIMIT",
            "Blocks single transactions exceeding $10,000. SOX compliance rule.",
            Blocked,
            &["amount > 10000"],
            r#"policy TRANSACTION_LIMIT {
  version: "1.0.4"
  applies_to: [transaction.create]
  tags: [SOX, MiFID-II]

  rule block_large_transactions {
    when {
      action.payload.amount > 10000
    }
    effect: BLOCK
    reason: "Single transaction limit exceeded (SOX §302 compliance)"
    audit: REQUIRED
  }
}"#,
        ),
        policy(
            "DATA_EXPORT_LIMIT",
            "Prevents bulk data exports exceeding 10,000 rows without compliance sign-off.",
            Blocked,
            &["rows > 10000", "compliance_approved != true"],
            r#"policy DATA_EXPORT_LIMIT {
  version: "1.1.0"
  applies_to: [data.export]
  tags: [GDPR, MiFID-II]

  rule block_bulk_export {
    when {
      action.payload.rows > 10000
      AND context.compliance_approved != true
    }
    effect: BLOCK
    reason: "Bulk data export requires compliance pre-approval"
  }
}"#,
        ),
    ];

    Ok(Scenario {
        industry: Industry::Fintech,
        label: "FinTech".to_string(),
        agents: vec!["trading-bot-v2".into(), "risk-analyzer".into(), "portfolio-manager".into()],
        actions,
        policies,
        stats_24h: HistoricalStats {
            total: 48_291,
            blocked: 9_134,
            escalated: 3_847,
            avg_latency: 1.4,
        },
    })
}
