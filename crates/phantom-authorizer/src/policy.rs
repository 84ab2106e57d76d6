//! Gateway access-control policy documents
//!
//! The authorizer answers with an IAM-style policy: a principal, a policy
//! document holding statements, and on allow a context map the gateway turns
//! into the upstream `Authorization` header.

use serde::{Deserialize, Serialize};

/// IAM policy language version
pub const POLICY_VERSION: &str = "2012-10-17";

/// The only action this authorizer grants or denies
pub const INVOKE_ACTION: &str = "execute-api:Invoke";

/// Principal reported by the deny-all decision
pub const DENY_ALL_PRINCIPAL: &str = "user";

/// Resource wildcard used by the deny-all decision
pub const WILDCARD_RESOURCE: &str = "*";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Allow,
    Deny,
}

/// One (action, effect, resource) statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyStatement {
    pub action: String,
    pub effect: Effect,
    pub resource: String,
}

impl PolicyStatement {
    pub fn invoke(effect: Effect, resource: impl Into<String>) -> Self {
        Self {
            action: INVOKE_ACTION.to_string(),
            effect,
            resource: resource.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    pub statement: Vec<PolicyStatement>,
}

/// Context handed to the gateway alongside an allow decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DecisionContext {
    /// Phantom token for the upstream `Authorization` header
    pub authorization: String,
}

/// The decision payload returned to the gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessDecision {
    pub principal_id: String,
    pub policy_document: PolicyDocument,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<DecisionContext>,
}

impl AccessDecision {
    /// The fixed deny-all decision.
    ///
    /// Every negative outcome produces exactly this shape, so the caller
    /// cannot tell a scope mismatch from an unreadable phantom token.
    pub fn deny_all() -> Self {
        Self {
            principal_id: DENY_ALL_PRINCIPAL.to_string(),
            policy_document: PolicyDocument {
                version: POLICY_VERSION.to_string(),
                statement: vec![PolicyStatement::invoke(Effect::Deny, WILDCARD_RESOURCE)],
            },
            context: None,
        }
    }

    /// Allow `principal_id` to invoke exactly `resource`
    pub fn allow(principal_id: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            principal_id: principal_id.into(),
            policy_document: PolicyDocument {
                version: POLICY_VERSION.to_string(),
                statement: vec![PolicyStatement::invoke(Effect::Allow, resource)],
            },
            context: None,
        }
    }

    /// Whether the decision grants access
    pub fn is_allow(&self) -> bool {
        self.policy_document
            .statement
            .iter()
            .any(|s| s.effect == Effect::Allow)
    }

    /// Attach the phantom token for upstream forwarding.
    ///
    /// Only allow decisions carry a context; on a deny this is a no-op.
    pub fn with_forwarding_token(mut self, phantom_token: impl Into<String>) -> Self {
        if self.is_allow() {
            self.context = Some(DecisionContext {
                authorization: phantom_token.into(),
            });
        }
        self
    }
}

/// Build the decision for a scope-match result.
///
/// A match yields a single allow statement for `resource`; anything else
/// falls back to [`AccessDecision::deny_all`].
pub fn build_decision(matched: bool, principal_id: &str, resource: &str) -> AccessDecision {
    if matched {
        AccessDecision::allow(principal_id, resource)
    } else {
        AccessDecision::deny_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ARN: &str = "arn:aws:execute-api:eu-west-1:123456789012:abcdef/prod/GET/orders";

    #[test]
    fn test_allow_shape() {
        let decision = build_decision(true, "alice", ARN);
        let value = serde_json::to_value(&decision).unwrap();
        assert_eq!(
            value,
            json!({
                "principalId": "alice",
                "policyDocument": {
                    "Version": "2012-10-17",
                    "Statement": [
                        {"Action": "execute-api:Invoke", "Effect": "Allow", "Resource": ARN}
                    ]
                }
            })
        );
    }

    #[test]
    fn test_deny_all_shape() {
        let decision = build_decision(false, "alice", ARN);
        let value = serde_json::to_value(&decision).unwrap();
        assert_eq!(
            value,
            json!({
                "principalId": "user",
                "policyDocument": {
                    "Version": "2012-10-17",
                    "Statement": [
                        {"Action": "execute-api:Invoke", "Effect": "Deny", "Resource": "*"}
                    ]
                }
            })
        );
    }

    #[test]
    fn test_deny_ignores_principal_and_resource() {
        assert_eq!(
            build_decision(false, "alice", ARN),
            build_decision(false, "bob", "arn:other")
        );
        assert_eq!(build_decision(false, "alice", ARN), AccessDecision::deny_all());
    }

    #[test]
    fn test_forwarding_token_only_on_allow() {
        let allow = build_decision(true, "alice", ARN).with_forwarding_token("a.b.c");
        assert_eq!(
            allow.context,
            Some(DecisionContext {
                authorization: "a.b.c".to_string()
            })
        );

        let deny = AccessDecision::deny_all().with_forwarding_token("a.b.c");
        assert!(deny.context.is_none());
    }

    #[test]
    fn test_never_mixes_effects() {
        for matched in [true, false] {
            let decision = build_decision(matched, "alice", ARN);
            assert_eq!(decision.policy_document.statement.len(), 1);
            assert_eq!(decision.is_allow(), matched);
        }
    }

    #[test]
    fn test_context_serializes_as_authorization() {
        let decision = AccessDecision::allow("alice", ARN).with_forwarding_token("h.p.s");
        let value = serde_json::to_value(&decision).unwrap();
        assert_eq!(value["context"], json!({"Authorization": "h.p.s"}));
    }
}
