//! Banking: a trading desk with wire transfers and margin control.

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
            "TradeBot-v2",
            json!({ "amount": 4200, "currency": "USD", "instrument": "AAPL", "side": "BUY", "accountId": "ACC-00291" }),
            &[Allowed, Allowed, Allowed, Allowed, Blocked],
            "TRANSACTION_LIMIT",
            (0.8, 1.6),
        )?,
        template(
            "position.open",
            "TradeBot-v2",
            json!({ "symbol": "TSLA", "notional": 72000, "side": "LONG", "leverage": 2, "accountId": "ACC-00291" }),
            &[Blocked, Blocked, Escalated],
            "MAX_POSITION_SIZE",
            (1.1, 2.2),
        )?,
        template(
            "position.open",
            "PortfolioManager",
            json!({ "symbol": "MSFT", "notional": 38000, "side": "LONG", "leverage": 1, "accountId": "ACC-00184" }),
            &[Escalated, Escalated, Allowed],
            "MAX_POSITION_SIZE",
            (1.0, 1.9),
        )?,
        template(
            "wire.transfer",
            "TradeBot-v2",
            json!({
                "amount": 95000,
                "currency": "USD",
                "fromAccount": "ACC-00291",
                "toAccount": "EXT-884721",
                "purpose": "settlement"
            }),
            &[Blocked, Blocked, Escalated],
            "WIRE_TRANSFER_POLICY",
            (1.3, 2.1),
        )?,
        template(
            "account.read",
            "RiskAnalyzer",
            json!({ "accountId": "ACC-00184", "fields": ["balance", "positions", "exposure"] }),
            &[Allowed, Allowed, Allowed, Allowed],
            "KYC_REQUIRED",
            (0.5, 1.0),
        )?,
        template(
            "margin.adjust",
            "RiskAnalyzer",
            json!({
                "accountId": "ACC-00384",
                "adjustment": -18000,
                "reason": "risk_rebalance",
                "triggeredBy": "volatility_spike"
            }),
            &[Allowed, Allowed, Escalated],
            "MARGIN_CONTROL",
            (0.7, 1.4),
        )?,
        template(
            "trade.cancel",
            "TradeBot-v2",
            json!({ "orderId": "ORD-88234", "symbol": "AAPL", "reason": "risk_limit_breach" }),
            &[Allowed, Allowed, Allowed],
            "TRADING_HOURS",
            (0.6, 1.2),
        )?,
    ];

    let policies = vec![
        policy(
            "MAX_POSITION_SIZE",
            "Blocks positions over $50,000. Escalates positions between $30,000 and $50,000 to a senior trader. SOX §302 compliance.",
            Blocked,
            &["notional > 50000", "approval_level < SENIOR"],
            r#"policy MAX_POSITION_SIZE {
  version: "1.3.0"
  applies_to: [position.open, position.increase]
  tags: [SOX, MiFID-II]

  rule block_oversized_positions {
    when {
      action.payload.notional > 50000
      AND context.approval_level < "SENIOR"
    }
    effect: BLOCK
    reason: "Position size exceeds single-trade limit without senior approval"
    notify: [risk-desk@apexcapital.com]
    audit: REQUIRED
  }

  rule escalate_large_positions {
    when {
      action.payload.notional >= 30000
      AND action.payload.notional <= 50000
    }
    effect: ESCALATE
    escalate_to: "senior-trader"
    sla_minutes: 15
    block_on_timeout: true
  }
}"#,
        ),
        policy(
            "TRANSACTION_LIMIT",
            "Blocks single transactions exceeding $10,000 without KYC verification. SOX compliance.",
            Blocked,
            &["amount > 10000", "kyc_verified != true"],
            r#"policy TRANSACTION_LIMIT {
  version: "1.0.4"
  applies_to: [transaction.create]
  tags: [SOX, AML]

  rule block_large_unverified {
    when {
      action.payload.amount > 10000
      AND context.kyc_verified != true
    }
    effect: BLOCK
    reason: "Transaction exceeds limit, KYC verification required"
    audit: REQUIRED
  }

  rule flag_suspicious_amount {
    when {
      action.payload.amount > 7500
      AND action.payload.amount <= 10000
    }
    effect: ESCALATE
    escalate_to: "aml-team"
    sla_minutes: 30
    reason: "Transaction near reporting threshold, AML review required"
  }
}"#,
        ),
        policy(
            "WIRE_TRANSFER_POLICY",
            "All outbound wire transfers above $50,000 require dual authorization from compliance.",
            Escalated,
            &["amount > 50000", "dual_auth != true"],
            r#"policy WIRE_TRANSFER_POLICY {
  version: "2.0.0"
  applies_to: [wire.transfer, external.payment]
  tags: [AML, SOX, SWIFT]

  rule block_unauthorized_wire {
    when {
      action.payload.amount > 100000
      AND context.dual_auth != true
    }
    effect: BLOCK
    reason: "Wire transfers above $100k require dual authorization"
    notify: [compliance@apexcapital.com, cro@apexcapital.com]
    audit: REQUIRED
  }

  rule escalate_large_wire {
    when {
      action.payload.amount > 50000
      AND context.dual_auth != true
    }
    effect: ESCALATE
    escalate_to: "compliance-officer"
    sla_minutes: 20
    block_on_timeout: true
  }
}"#,
        ),
        policy(
            "TRADING_HOURS",
            "Restricts automated trading to NYSE market hours (9:30am to 4:00pm ET, weekdays only).",
            Blocked,
            &["time NOT IN 09:30-16:00 ET", "weekday IN MON-FRI"],
            r#"policy TRADING_HOURS {
  version: "2.1.0"
  applies_to: [transaction.create, position.open, trade.execute]

  rule market_hours_only {
    when {
      context.timestamp.hour NOT IN [9..16]
      OR context.timestamp.weekday IN ["SAT", "SUN"]
    }
    effect: BLOCK
    reason: "Automated trades are only permitted during NYSE market hours"
  }
}"#,
        ),
        policy(
            "KYC_REQUIRED",
            "Ensures KYC status is verified before any account data is read by an agent.",
            Allowed,
            &["kyc_status == VERIFIED", "audit: REQUIRED"],
            r#"policy KYC_REQUIRED {
  version: "1.1.0"
  applies_to: [account.read, account.update]
  tags: [KYC, AML]

  rule require_kyc_verification {
    when {
      context.kyc_status == "VERIFIED"
    }
    effect: ALLOW
    audit: REQUIRED
    log_level: INFO
  }

  rule block_unverified_access {
    when {
      context.kyc_status != "VERIFIED"
    }
    effect: BLOCK
    reason: "Account access requires completed KYC verification"
  }
}"#,
        ),
    ];

    Ok(Scenario {
        industry: Industry::Banking,
        label: "Banking".to_string(),
        agents: vec!["TradeBot-v2".into(), "RiskAnalyzer".into(), "PortfolioManager".into()],
        actions,
        policies,
        stats_24h: HistoricalStats {
            total: 53_840,
            blocked: 11_204,
            escalated: 6_319,
            avg_latency: 1.4,
        },
    })
}
