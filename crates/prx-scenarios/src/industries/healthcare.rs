//! Healthcare: clinical agents touching PHI, prescriptions, and labs.

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
            "patient.record.access",
            "records-agent",
            json!({
                "patientId": "PAT-00471",
                "fields": ["diagnosis", "medications", "lab_results"],
                "purpose": "treatment"
            }),
            &[Allowed, Allowed, Allowed, Escalated],
            "PHI_ACCESS_CONTROL",
            (1.2, 2.1),
        )?,
        template(
            "phi.export",
            "diagnostic-ai",
            json!({ "dataType": "MRI_scans", "patientCount": 240, "destination": "research-db", "anonymized": false }),
            &[Blocked, Blocked, Escalated],
            "HIPAA_MINIMUM_NECESSARY",
            (1.5, 2.5),
        )?,
        template(
            "prescription.write",
            "diagnostic-ai",
            json!({ "patientId": "PAT-00892", "drug": "Amoxicillin 500mg", "dosage": "3x daily", "duration": "7 days" }),
            &[Escalated, Escalated, Allowed],
            "PHYSICIAN_OVERSIGHT",
            (1.0, 1.9),
        )?,
        template(
            "appointment.create",
            "scheduling-bot",
            json!({ "patientId": "PAT-00293", "provider": "Dr. Chen", "type": "follow-up", "date": "2026-03-15" }),
            &[Allowed, Allowed, Allowed, Allowed],
            "SCHEDULING_POLICY",
            (0.6, 1.1),
        )?,
        template(
            "lab.order",
            "diagnostic-ai",
            json!({ "patientId": "PAT-00741", "tests": ["CBC", "CMP", "HbA1c"], "priority": "STAT" }),
            &[Allowed, Allowed, Escalated],
            "LAB_ORDER_POLICY",
            (0.9, 1.6),
        )?,
    ];

    let policies = vec![
        policy(
            "PHI_ACCESS_CONTROL",
            "Enforces HIPAA minimum necessary standard for all PHI access by AI agents.",
            Blocked,
            &["purpose NOT IN [treatment, payment, operations]", "agent_role MISSING"],
            r#"policy PHI_ACCESS_CONTROL {
  version: "3.0.1"
  applies_to: [patient.record.access, phi.read]
  tags: [HIPAA, PHI]

  rule enforce_minimum_necessary {
    when {
      action.payload.purpose NOT IN ["treatment", "payment", "healthcare_operations"]
      OR context.agent_role IS NULL
    }
    effect: BLOCK
    reason: "PHI access denied: purpose not within HIPAA minimum necessary standard"
    audit: REQUIRED
    notify: [privacy-officer@hospital.org]
  }

  rule escalate_after_hours {
    when {
      context.timestamp.hour NOT IN [7..20]
      AND action.payload.purpose != "emergency"
    }
    effect: ESCALATE
    escalate_to: "on-call-privacy-officer"
    sla_minutes: 10
  }
}"#,
        ),
        policy(
            "HIPAA_MINIMUM_NECESSARY",
            "Blocks bulk PHI exports to non-anonymized destinations.",
            Blocked,
            &["anonymized != true", "patientCount > 100"],
            r#"policy HIPAA_MINIMUM_NECESSARY {
  version: "2.2.0"
  applies_to: [phi.export, data.export]
  tags: [HIPAA, GDPR]

  rule block_non_anonymized_bulk {
    when {
      action.payload.anonymized != true
      AND action.payload.patientCount > 100
    }
    effect: BLOCK
    reason: "Bulk PHI export must be fully anonymized per HIPAA Safe Harbor"
  }

  rule require_irb_approval {
    when {
      action.payload.destination CONTAINS "research"
    }
    effect: ESCALATE
    escalate_to: "irb-committee"
    sla_minutes: 2880
  }
}"#,
        ),
        policy(
            "PHYSICIAN_OVERSIGHT",
            "All AI-generated prescriptions must be reviewed by a licensed physician.",
            Escalated,
            &["actor.type == AI_AGENT", "action.type == prescription.write"],
            r#"policy PHYSICIAN_OVERSIGHT {
  version: "1.0.0"
  applies_to: [prescription.write, treatment.plan.create]

  rule ai_prescription_review {
    when {
      context.actor.type == "AI_AGENT"
    }
    effect: ESCALATE
    escalate_to: "supervising-physician"
    sla_minutes: 30
    reason: "AI-generated prescriptions require physician sign-off"
    block_on_timeout: true
  }
}"#,
        ),
    ];

    Ok(Scenario {
        industry: Industry::Healthcare,
        label: "Healthcare".to_string(),
        agents: vec!["diagnostic-ai".into(), "scheduling-bot".into(), "records-agent".into()],
        actions,
        policies,
        stats_24h: HistoricalStats {
            total: 31_042,
            blocked: 4_812,
            escalated: 6_231,
            avg_latency: 1.7,
        },
    })
}
