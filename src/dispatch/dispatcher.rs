use std::collections::BTreeMap;

use super::invocation::{CommandCall, Invocation};
use crate::schema::{is_supplied, is_worth_sending, CommandTable, Requirement};
use crate::transport::{Exchange, Gateway};
use crate::utils::BankingError;

/// Resolves command calls against a table and drives them through a gateway
pub struct Dispatcher<G: Gateway> {
    table: &'static CommandTable,
    gateway: G,
}

impl<G: Gateway> Dispatcher<G> {
    pub fn new(gateway: G) -> Self {
        Self::with_table(CommandTable::builtin(), gateway)
    }

    pub fn with_table(table: &'static CommandTable, gateway: G) -> Self {
        Self { table, gateway }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Validate a call and bind its values; no I/O happens here
    pub fn resolve(&self, call: &CommandCall) -> Result<Invocation, BankingError> {
        let spec = self
            .table
            .lookup(call.resource, call.verb)
            .ok_or_else(|| BankingError::UnknownCommand {
                resource: call.resource.to_string(),
                verb: call.verb.to_string(),
            })?;
        let command = spec.display_name();

        if let Some(missing) = spec.positionals.get(call.positionals.len()) {
            return Err(BankingError::MissingArgument {
                command,
                argument: *missing,
            });
        }
        if let Some(extra) = call.positionals.get(spec.positionals.len()) {
            return Err(BankingError::UnexpectedArgument {
                command,
                value: extra.clone(),
            });
        }
        // Dot segments are normalized away by the URL parser even when encoded
        if let Some((name, value)) = spec
            .positionals
            .iter()
            .zip(&call.positionals)
            .find(|(_, value)| matches!(value.as_str(), "." | ".."))
        {
            return Err(BankingError::UnroutableArgument {
                command,
                argument: *name,
                value: value.clone(),
            });
        }
        let positionals = spec
            .positionals
            .iter()
            .copied()
            .zip(call.positionals.iter().cloned())
            .collect();

        if let Some(name) = call.options.keys().find(|name| spec.option(name).is_none()) {
            return Err(BankingError::UndeclaredOption {
                command,
                option: name.to_string(),
            });
        }

        let mut options = BTreeMap::new();
        for option in spec.options {
            // Explicit values for defaulted options are sent as given, zero included
            let given = call.options.get(option.name);
            let supplied = match option.requirement {
                Requirement::Required => given.filter(|value| is_supplied(value)),
                Requirement::Optional => given.filter(|value| is_worth_sending(value)),
                Requirement::Defaulted(_) => given,
            };

            if let Some(value) = supplied {
                if value.kind() != option.kind {
                    return Err(BankingError::MistypedOption {
                        command,
                        option: option.name,
                        expected: option.kind.describe(),
                    });
                }
                options.insert(option.name, value.clone());
                continue;
            }

            match option.requirement {
                Requirement::Required => {
                    return Err(BankingError::MissingOption {
                        command,
                        option: option.name,
                    })
                }
                Requirement::Defaulted(default) => {
                    options.insert(option.name, default.to_value());
                }
                Requirement::Optional => {}
            }
        }

        Ok(Invocation {
            spec,
            positionals,
            options,
        })
    }

    /// Resolve, build and send; validation failures never reach the gateway
    pub async fn dispatch(&self, call: &CommandCall) -> Result<Exchange, BankingError> {
        let invocation = self.resolve(call)?;
        let request = invocation.to_request()?;
        tracing::debug!(
            "{} -> {} {}",
            invocation.spec.display_name(),
            request.method,
            request.path
        );
        self.gateway.send(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{HttpMethod, OptionValue, Resource};
    use crate::transport::{ApiRequest, MockGateway};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn offline() -> Dispatcher<MockGateway> {
        let mut gateway = MockGateway::new();
        gateway.expect_send().never();
        Dispatcher::new(gateway)
    }

    fn request_for(call: CommandCall) -> ApiRequest {
        offline().resolve(&call).unwrap().to_request().unwrap()
    }

    fn body_json(request: &ApiRequest) -> String {
        serde_json::to_string(request.body.as_ref().unwrap()).unwrap()
    }

    #[test]
    fn test_read_substitutes_placeholder() {
        let request = request_for(CommandCall::new(Resource::Loans, "get").arg("42"));
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.path, "/api/loans/42");
        assert_eq!(request.body, None);

        let request = request_for(CommandCall::new(Resource::Savings, "transactions").arg("ACC-7"));
        assert_eq!(request.path, "/api/savings/ACC-7/transactions");
    }

    #[test]
    fn test_positional_stays_one_path_segment() {
        let request = request_for(CommandCall::new(Resource::Loans, "get").arg("../clients/5"));
        assert_eq!(request.path, "/api/loans/..%2Fclients%2F5");

        let call = CommandCall::new(Resource::Savings, "deposit")
            .arg("7?x=1#top")
            .option("amount", Some(5.0));
        let request = request_for(call);
        assert_eq!(request.path, "/api/savings/7%3Fx=1%23top/deposit");

        let request = request_for(CommandCall::new(Resource::Clients, "get").arg("John Doe 100%"));
        assert_eq!(request.path, "/api/clients/John%20Doe%20100%25");
    }

    #[test]
    fn test_dot_segment_rejected() {
        for value in [".", ".."] {
            let err = offline()
                .resolve(&CommandCall::new(Resource::Loans, "schedule").arg(value))
                .unwrap_err();
            assert!(matches!(err, BankingError::UnroutableArgument { argument: "loan_id", .. }));
            assert!(err.is_local());
        }
    }

    #[test]
    fn test_client_create_body() {
        let call = CommandCall::new(Resource::Clients, "create")
            .option("first", Some("John"))
            .option("last", Some("Doe"))
            .option("mobile", Some("+525551234567"));
        let request = request_for(call);

        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.path, "/api/clients");
        assert_eq!(
            body_json(&request),
            r#"{"firstname":"John","lastname":"Doe","office_id":1,"is_active":true,"mobile_no":"+525551234567"}"#
        );
    }

    #[test]
    fn test_optional_field_left_out() {
        let call = CommandCall::new(Resource::Clients, "create")
            .option("first", Some("Ana"))
            .option("last", Some("Ruiz"))
            .option("active", Some(false))
            .option("office", Some(3_i64));
        let request = request_for(call);
        assert_eq!(
            request.body.unwrap(),
            json!({"firstname": "Ana", "lastname": "Ruiz", "office_id": 3, "is_active": false})
                .as_object()
                .unwrap()
                .clone()
        );
    }

    #[test]
    fn test_action_sends_empty_document() {
        let request = request_for(CommandCall::new(Resource::Clients, "activate").arg("101"));
        assert_eq!(request.path, "/api/clients/101/activate");
        assert_eq!(body_json(&request), "{}");

        let request = request_for(CommandCall::new(Resource::Savings, "post-interest").arg("7"));
        assert_eq!(request.path, "/api/savings/7/post-interest");
        assert_eq!(body_json(&request), "{}");
    }

    #[test]
    fn test_defaults_substituted() {
        let request = request_for(CommandCall::new(Resource::Clients, "close").arg("101"));
        assert_eq!(body_json(&request), r#"{"closure_reason_id":17}"#);

        let request = request_for(CommandCall::new(Resource::Loans, "reject").arg("42"));
        assert_eq!(
            body_json(&request),
            r#"{"note":"Rejected via AI Agent due to risk profile"}"#
        );

        let call = CommandCall::new(Resource::Savings, "charge")
            .arg("7")
            .option("amount", Some(15.0));
        assert_eq!(body_json(&request_for(call)), r#"{"amount":15.0,"charge_id":1}"#);
    }

    #[test]
    fn test_renamed_wire_keys() {
        let call = CommandCall::new(Resource::Loans, "late-fee")
            .arg("42")
            .option("amount", Some(50.0));
        let request = request_for(call);
        assert_eq!(request.path, "/api/loans/42/late-fee");
        assert_eq!(body_json(&request), r#"{"fee_amount":50.0}"#);

        let call = CommandCall::new(Resource::Clients, "update-mobile")
            .arg("101")
            .option("mobile", Some("+525559876543"));
        let request = request_for(call);
        assert_eq!(request.method, HttpMethod::Put);
        assert_eq!(body_json(&request), r#"{"new_mobile_no":"+525559876543"}"#);
    }

    #[test]
    fn test_search_uses_query_parameter() {
        let call = CommandCall::new(Resource::Clients, "search").option("name", Some("John Doe"));
        let request = request_for(call);
        assert_eq!(request.path, "/api/clients/search");
        assert_eq!(request.query, vec![("name".to_string(), "John Doe".to_string())]);
        assert_eq!(request.body, None);
    }

    #[test]
    fn test_group_members_list() {
        let call = CommandCall::new(Resource::Groups, "create")
            .option("name", Some("The Innovators"))
            .option("members", Some(vec![101_i64, 102]));
        assert_eq!(
            body_json(&request_for(call)),
            r#"{"name":"The Innovators","office_id":1,"client_members":[101,102]}"#
        );
    }

    #[test]
    fn test_singletons() {
        let call = CommandCall::new(Resource::Ask, "").option("message", Some("balance of 7?"));
        let request = request_for(call);
        assert_eq!(request.path, "/api/chat");
        assert_eq!(body_json(&request), r#"{"message":"balance of 7?"}"#);

        let call = CommandCall::new(Resource::Route, "").option("prompt", Some("deposit money"));
        let request = request_for(call);
        assert_eq!(request.path, "/api/router/intent");
        assert_eq!(body_json(&request), r#"{"prompt":"deposit money"}"#);
    }

    #[tokio::test]
    async fn test_missing_amount_never_reaches_gateway() {
        let dispatcher = offline();
        let err = dispatcher
            .dispatch(&CommandCall::new(Resource::Savings, "deposit").arg("7"))
            .await
            .unwrap_err();

        assert!(matches!(err, BankingError::MissingOption { option: "amount", .. }));
        assert_eq!(err.to_string(), "--amount is required");
        assert!(err.is_local());
    }

    #[tokio::test]
    async fn test_zero_amount_counts_as_missing() {
        let call = CommandCall::new(Resource::Loans, "create")
            .option("client", Some(101_i64))
            .option("principal", Some(0.0))
            .option("months", Some(12_i64));
        let err = offline().dispatch(&call).await.unwrap_err();
        assert!(matches!(err, BankingError::MissingOption { option: "principal", .. }));
    }

    #[test]
    fn test_non_positive_override_amount_is_omitted() {
        for amount in [0.0, -5.0] {
            let call = CommandCall::new(Resource::Loans, "approve")
                .arg("42")
                .option("amount", Some(amount));
            assert_eq!(body_json(&request_for(call)), "{}", "{}", amount);
        }

        let call = CommandCall::new(Resource::Loans, "approve")
            .arg("42")
            .option("amount", Some(18000.0));
        assert_eq!(body_json(&request_for(call)), r#"{"amount":18000.0}"#);
    }

    #[test]
    fn test_explicit_zero_or_empty_overrides_default() {
        let call = CommandCall::new(Resource::Clients, "close")
            .arg("101")
            .option("reason", Some(0_i64));
        assert_eq!(body_json(&request_for(call)), r#"{"closure_reason_id":0}"#);

        let call = CommandCall::new(Resource::Loans, "reject")
            .arg("42")
            .option("note", Some(""));
        assert_eq!(body_json(&request_for(call)), r#"{"note":""}"#);

        let call = CommandCall::new(Resource::Clients, "create")
            .option("first", Some("John"))
            .option("last", Some("Doe"))
            .option("office", Some(0_i64));
        assert_eq!(
            body_json(&request_for(call)),
            r#"{"firstname":"John","lastname":"Doe","office_id":0,"is_active":true}"#
        );
    }

    #[test]
    fn test_empty_optional_values_are_omitted() {
        let call = CommandCall::new(Resource::Groups, "create")
            .option("name", Some("The Innovators"))
            .option("members", Some(Vec::<i64>::new()));
        assert_eq!(
            body_json(&request_for(call)),
            r#"{"name":"The Innovators","office_id":1}"#
        );
    }

    #[tokio::test]
    async fn test_missing_positional() {
        let err = offline()
            .dispatch(&CommandCall::new(Resource::Groups, "get"))
            .await
            .unwrap_err();
        assert!(matches!(err, BankingError::MissingArgument { argument: "group_id", .. }));
        assert_eq!(err.to_string(), "missing <group_id> argument for `groups get`");
    }

    #[test]
    fn test_extra_positional_rejected() {
        let call = CommandCall::new(Resource::Loans, "get").arg("42").arg("43");
        let err = offline().resolve(&call).unwrap_err();
        assert!(matches!(err, BankingError::UnexpectedArgument { .. }));
    }

    #[test]
    fn test_unknown_and_mistyped() {
        let err = offline()
            .resolve(&CommandCall::new(Resource::Groups, "delete").arg("5"))
            .unwrap_err();
        assert!(matches!(err, BankingError::UnknownCommand { .. }));

        let call = CommandCall::new(Resource::Loans, "get").arg("42").option("amount", Some(1.0));
        assert!(matches!(
            offline().resolve(&call).unwrap_err(),
            BankingError::UndeclaredOption { .. }
        ));

        let call = CommandCall::new(Resource::Savings, "deposit")
            .arg("7")
            .option("amount", Some("lots"));
        assert!(matches!(
            offline().resolve(&call).unwrap_err(),
            BankingError::MistypedOption { expected: "floating-point", .. }
        ));
    }

    #[tokio::test]
    async fn test_non_finite_amount_fails_before_transport() {
        let call = CommandCall::new(Resource::Savings, "withdraw")
            .arg("7")
            .option("amount", Some(f64::INFINITY));
        let err = offline().dispatch(&call).await.unwrap_err();
        assert!(matches!(err, BankingError::EncodingFailure(_)));
    }

    #[tokio::test]
    async fn test_valid_call_sent_once() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_send()
            .withf(|request: &ApiRequest| {
                request.method == HttpMethod::Post
                    && request.path == "/api/savings/7/deposit"
                    && request.body.as_ref().and_then(|b| b.get("amount")) == Some(&json!(500.0))
            })
            .times(1)
            .returning(|_| Ok(Exchange::new(200, r#"{"savingsId":7}"#)));

        let call = CommandCall::new(Resource::Savings, "deposit")
            .arg("7")
            .option("amount", Some(500.0));
        let exchange = Dispatcher::new(gateway).dispatch(&call).await.unwrap();
        assert_eq!(exchange.status, 200);
    }

    #[test]
    fn test_every_command_resolves_with_required_values() {
        let dispatcher = offline();
        for spec in CommandTable::builtin().specs() {
            let mut call = CommandCall::new(spec.resource, spec.verb);
            for (index, _) in spec.positionals.iter().enumerate() {
                call = call.arg((index + 1).to_string());
            }
            for option in spec.options {
                if option.requirement == Requirement::Required {
                    let value = match option.kind {
                        crate::schema::OptionKind::Text => OptionValue::from("x"),
                        crate::schema::OptionKind::Integer => OptionValue::from(1_i64),
                        crate::schema::OptionKind::Float => OptionValue::from(1.5),
                        crate::schema::OptionKind::Bool => OptionValue::from(true),
                        crate::schema::OptionKind::IntegerList => OptionValue::from(vec![1_i64]),
                    };
                    call = call.option(option.name, Some(value));
                }
            }

            let request = dispatcher.resolve(&call).unwrap().to_request().unwrap();
            assert_eq!(request.method, spec.method);
            assert!(!request.path.contains('{'), "{}", request.path);
            assert_eq!(request.body.is_some(), spec.method != HttpMethod::Get);
        }
    }
}
