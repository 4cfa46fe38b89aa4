//! Enterprise SaaS: multi-tenant admin and data-sync agents.

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
            "tenant.data.access",
            "analytics-engine",
            json!({ "tenantId": "tenant-acme-corp", "targetTenantId": "tenant-globex", "table": "orders" }),
            &[Blocked, Blocked, Blocked],
            "TENANT_ISOLATION",
            (0.8, 1.6),
        )?,
        template(
            "user.delete",
            "admin-bot",
            json!({ "userId": "usr-00481", "tenantId": "tenant-stark-ind", "reason": "offboarding" }),
            &[Escalated, Allowed, Allowed],
            "RBAC_ENFORCEMENT",
            (0.9, 1.8),
        )?,
        template(
            "bulk.export",
            "data-sync-agent",
            json!({ "tenantId": "tenant-wayne-ent", "records": 85000, "format": "JSON", "destination": "external-api" }),
            &[Blocked, Escalated, Blocked],
            "DATA_EXPORT_LIMIT",
            (1.1, 2.0),
        )?,
        template(
            "config.override",
            "admin-bot",
            json!({ "tenantId": "tenant-acme-corp", "setting": "max_api_rate", "value": 100000 }),
            &[Escalated, Allowed],
            "TENANT_CONFIG_POLICY",
            (0.7, 1.4),
        )?,
        template(
            "report.generate",
            "analytics-engine",
            json!({ "tenantId": "tenant-umbrella", "reportType": "usage_analytics", "period": "30d" }),
            &[Allowed, Allowed, Allowed, Allowed],
            "ANALYTICS_POLICY",
            (0.5, 1.0),
        )?,
    ];

    let policies = vec![
        policy(
            "TENANT_ISOLATION",
            "Enforces strict tenant data isolation. Cross-tenant data access is always blocked.",
            Blocked,
            &["context.tenantId != action.payload.targetTenantId"],
            r#"policy TENANT_ISOLATION {
  version: "5.0.0"
  applies_to: [tenant.data.access, data.query, report.generate]
  tags: [MULTI_TENANT, SOC2]

  rule block_cross_tenant_access {
    when {
      context.tenant_id != action.payload.tenantId
      OR action.payload.targetTenantId IS NOT NULL
        AND action.payload.targetTenantId != context.tenant_id
    }
    effect: BLOCK
    reason: "Cross-tenant data access is strictly prohibited"
    audit: REQUIRED
    severity: CRITICAL
    notify: [security@saas.io, cto@saas.io]
  }
}"#,
        ),
        policy(
            "RBAC_ENFORCEMENT",
            "Validates agent roles match required permissions before any destructive operation.",
            Blocked,
            &["agent.role < REQUIRED_ROLE", "operation IN [delete, update, admin]"],
            r#"policy RBAC_ENFORCEMENT {
  version: "2.3.1"
  applies_to: [user.delete, user.update, tenant.suspend]

  rule validate_role {
    when {
      context.agent_role NOT IN action.required_roles
    }
    effect: BLOCK
    reason: "Insufficient role permissions for this operation"
  }

  rule escalate_admin_ops {
    when {
      action.type IN ["user.delete", "tenant.suspend"]
      AND context.agent_role == "ADMIN"
    }
    effect: ESCALATE
    escalate_to: "account-owner"
    sla_minutes: 30
  }
}"#,
        ),
        policy(
            "DATA_EXPORT_LIMIT",
            "Limits bulk exports to 10,000 records per request without explicit approval.",
            Blocked,
            &["records > 10000", "approval IS NULL"],
            r#"policy DATA_EXPORT_LIMIT {
  version: "1.4.0"
  applies_to: [bulk.export, data.sync]
  tags: [GDPR, DATA_GOVERNANCE]

  rule block_oversized_export {
    when {
      action.payload.records > 10000
      AND context.export_approval IS NULL
    }
    effect: BLOCK
    reason: "Export exceeds per-request limit. Submit export approval request."
  }

  rule escalate_large_export {
    when {
      action.payload.records > 5000
      AND action.payload.records <= 10000
    }
    effect: ESCALATE
    escalate_to: "data-governance-team"
    sla_minutes: 120
  }
}"#,
        ),
    ];

    Ok(Scenario {
        industry: Industry::Saas,
        label: "Enterprise SaaS".to_string(),
        agents: vec!["data-sync-agent".into(), "admin-bot".into(), "analytics-engine".into()],
        actions,
        policies,
        stats_24h: HistoricalStats {
            total: 61_003,
            blocked: 9_241,
            escalated: 5_822,
            avg_latency: 1.2,
        },
    })
}
