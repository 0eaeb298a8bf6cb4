use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::spec::{
    bind, Binding, Body, CommandSpec, DefaultValue, HttpMethod, OptionKind, OptionSpec, Resource,
};
use crate::constants::{
    DEFAULT_CHARGE_ID, DEFAULT_CLOSURE_REASON_ID, DEFAULT_OFFICE_ID, DEFAULT_PRODUCT_ID,
    DEFAULT_REJECT_NOTE, DEFAULT_WAIVER_NOTE,
};

use HttpMethod::{Get, Post, Put};
use OptionKind::{Bool, Float, Integer, IntegerList, Text};

const CLIENT_ID: &[&str] = &["client_id"];
const GROUP_ID: &[&str] = &["group_id"];
const LOAN_ID: &[&str] = &["loan_id"];
const ACCOUNT_ID: &[&str] = &["account_id"];

const NO_OPTIONS: &[OptionSpec] = &[];
const NO_BINDINGS: &[Binding] = &[];
const EMPTY_BODY: Body = Body::Document(NO_BINDINGS);

const OFFICE: OptionSpec =
    OptionSpec::defaulted("office", Integer, DefaultValue::Integer(DEFAULT_OFFICE_ID));
const PRODUCT: OptionSpec =
    OptionSpec::defaulted("product", Integer, DefaultValue::Integer(DEFAULT_PRODUCT_ID));
const AMOUNT: OptionSpec = OptionSpec::required("amount", Float);
const AMOUNT_ONLY: &[OptionSpec] = &[AMOUNT];
const AMOUNT_FIELD: &[Binding] = &[bind("amount", "amount")];

const fn read(
    resource: Resource,
    verb: &'static str,
    path: &'static str,
    positionals: &'static [&'static str],
) -> CommandSpec {
    CommandSpec {
        resource,
        verb,
        method: Get,
        path,
        positionals,
        options: NO_OPTIONS,
        query: NO_BINDINGS,
        body: Body::Absent,
    }
}

/// A state-changing call whose only input is the path identifier
const fn action(
    resource: Resource,
    verb: &'static str,
    path: &'static str,
    positionals: &'static [&'static str],
) -> CommandSpec {
    CommandSpec {
        resource,
        verb,
        method: Post,
        path,
        positionals,
        options: NO_OPTIONS,
        query: NO_BINDINGS,
        body: EMPTY_BODY,
    }
}

static COMMANDS: &[CommandSpec] = &[
    // clients
    CommandSpec {
        resource: Resource::Clients,
        verb: "search",
        method: Get,
        path: "/api/clients/search",
        positionals: &[],
        options: &[OptionSpec::required("name", Text)],
        query: &[bind("name", "name")],
        body: Body::Absent,
    },
    read(Resource::Clients, "get", "/api/clients/{client_id}", CLIENT_ID),
    read(Resource::Clients, "accounts", "/api/clients/{client_id}/accounts", CLIENT_ID),
    CommandSpec {
        resource: Resource::Clients,
        verb: "create",
        method: Post,
        path: "/api/clients",
        positionals: &[],
        options: &[
            OptionSpec::required("first", Text),
            OptionSpec::required("last", Text),
            OptionSpec::optional("mobile", Text),
            OFFICE,
            OptionSpec::defaulted("active", Bool, DefaultValue::Bool(true)),
        ],
        query: NO_BINDINGS,
        body: Body::Document(&[
            bind("firstname", "first"),
            bind("lastname", "last"),
            bind("office_id", "office"),
            bind("is_active", "active"),
            bind("mobile_no", "mobile"),
        ]),
    },
    action(Resource::Clients, "activate", "/api/clients/{client_id}/activate", CLIENT_ID),
    CommandSpec {
        resource: Resource::Clients,
        verb: "update-mobile",
        method: Put,
        path: "/api/clients/{client_id}/mobile",
        positionals: CLIENT_ID,
        options: &[OptionSpec::required("mobile", Text)],
        query: NO_BINDINGS,
        body: Body::Document(&[bind("new_mobile_no", "mobile")]),
    },
    CommandSpec {
        resource: Resource::Clients,
        verb: "close",
        method: Post,
        path: "/api/clients/{client_id}/close",
        positionals: CLIENT_ID,
        options: &[OptionSpec::defaulted(
            "reason",
            Integer,
            DefaultValue::Integer(DEFAULT_CLOSURE_REASON_ID),
        )],
        query: NO_BINDINGS,
        body: Body::Document(&[bind("closure_reason_id", "reason")]),
    },
    // groups
    CommandSpec {
        resource: Resource::Groups,
        verb: "create",
        method: Post,
        path: "/api/groups",
        positionals: &[],
        options: &[
            OptionSpec::required("name", Text),
            OFFICE,
            OptionSpec::optional("members", IntegerList),
        ],
        query: NO_BINDINGS,
        body: Body::Document(&[
            bind("name", "name"),
            bind("office_id", "office"),
            bind("client_members", "members"),
        ]),
    },
    read(Resource::Groups, "get", "/api/groups/{group_id}", GROUP_ID),
    // loans
    read(Resource::Loans, "get", "/api/loans/{loan_id}", LOAN_ID),
    read(Resource::Loans, "schedule", "/api/loans/{loan_id}/schedule", LOAN_ID),
    CommandSpec {
        resource: Resource::Loans,
        verb: "create",
        method: Post,
        path: "/api/loans",
        positionals: &[],
        options: &[
            OptionSpec::required("client", Integer),
            OptionSpec::required("principal", Float),
            OptionSpec::required("months", Integer),
            PRODUCT,
        ],
        query: NO_BINDINGS,
        body: Body::Document(&[
            bind("client_id", "client"),
            bind("principal", "principal"),
            bind("months", "months"),
            bind("product_id", "product"),
        ]),
    },
    CommandSpec {
        resource: Resource::Loans,
        verb: "approve",
        method: Post,
        path: "/api/loans/{loan_id}/approve-disburse",
        positionals: LOAN_ID,
        options: &[OptionSpec::optional("amount", Float)],
        query: NO_BINDINGS,
        body: Body::Document(AMOUNT_FIELD),
    },
    CommandSpec {
        resource: Resource::Loans,
        verb: "reject",
        method: Post,
        path: "/api/loans/{loan_id}/reject",
        positionals: LOAN_ID,
        options: &[OptionSpec::defaulted("note", Text, DefaultValue::Text(DEFAULT_REJECT_NOTE))],
        query: NO_BINDINGS,
        body: Body::Document(&[bind("note", "note")]),
    },
    CommandSpec {
        resource: Resource::Loans,
        verb: "repay",
        method: Post,
        path: "/api/loans/{loan_id}/repayment",
        positionals: LOAN_ID,
        options: &[AMOUNT, OptionSpec::optional("note", Text)],
        query: NO_BINDINGS,
        body: Body::Document(&[bind("amount", "amount"), bind("note", "note")]),
    },
    CommandSpec {
        resource: Resource::Loans,
        verb: "late-fee",
        method: Post,
        path: "/api/loans/{loan_id}/late-fee",
        positionals: LOAN_ID,
        options: &[AMOUNT, OptionSpec::optional("note", Text)],
        query: NO_BINDINGS,
        body: Body::Document(&[bind("fee_amount", "amount"), bind("note", "note")]),
    },
    CommandSpec {
        resource: Resource::Loans,
        verb: "waive",
        method: Post,
        path: "/api/loans/{loan_id}/waive-interest",
        positionals: LOAN_ID,
        options: &[
            AMOUNT,
            OptionSpec::defaulted("note", Text, DefaultValue::Text(DEFAULT_WAIVER_NOTE)),
        ],
        query: NO_BINDINGS,
        body: Body::Document(&[bind("amount", "amount"), bind("note", "note")]),
    },
    // savings
    read(Resource::Savings, "get", "/api/savings/{account_id}", ACCOUNT_ID),
    read(Resource::Savings, "transactions", "/api/savings/{account_id}/transactions", ACCOUNT_ID),
    CommandSpec {
        resource: Resource::Savings,
        verb: "create",
        method: Post,
        path: "/api/savings",
        positionals: &[],
        options: &[OptionSpec::required("client", Integer), PRODUCT],
        query: NO_BINDINGS,
        body: Body::Document(&[bind("client_id", "client"), bind("product_id", "product")]),
    },
    action(Resource::Savings, "approve", "/api/savings/{account_id}/approve-activate", ACCOUNT_ID),
    action(Resource::Savings, "close", "/api/savings/{account_id}/close", ACCOUNT_ID),
    action(Resource::Savings, "post-interest", "/api/savings/{account_id}/post-interest", ACCOUNT_ID),
    CommandSpec {
        resource: Resource::Savings,
        verb: "deposit",
        method: Post,
        path: "/api/savings/{account_id}/deposit",
        positionals: ACCOUNT_ID,
        options: AMOUNT_ONLY,
        query: NO_BINDINGS,
        body: Body::Document(AMOUNT_FIELD),
    },
    CommandSpec {
        resource: Resource::Savings,
        verb: "withdraw",
        method: Post,
        path: "/api/savings/{account_id}/withdraw",
        positionals: ACCOUNT_ID,
        options: AMOUNT_ONLY,
        query: NO_BINDINGS,
        body: Body::Document(AMOUNT_FIELD),
    },
    CommandSpec {
        resource: Resource::Savings,
        verb: "charge",
        method: Post,
        path: "/api/savings/{account_id}/charge",
        positionals: ACCOUNT_ID,
        options: &[
            AMOUNT,
            OptionSpec::defaulted("charge-id", Integer, DefaultValue::Integer(DEFAULT_CHARGE_ID)),
        ],
        query: NO_BINDINGS,
        body: Body::Document(&[bind("amount", "amount"), bind("charge_id", "charge-id")]),
    },
    // singletons
    CommandSpec {
        resource: Resource::Ask,
        verb: "",
        method: Post,
        path: "/api/chat",
        positionals: &[],
        options: &[OptionSpec::required("message", Text)],
        query: NO_BINDINGS,
        body: Body::Document(&[bind("message", "message")]),
    },
    CommandSpec {
        resource: Resource::Route,
        verb: "",
        method: Post,
        path: "/api/router/intent",
        positionals: &[],
        options: &[OptionSpec::required("prompt", Text)],
        query: NO_BINDINGS,
        body: Body::Document(&[bind("prompt", "prompt")]),
    },
];

/// Immutable lookup of every registered command, keyed by (resource, verb)
pub struct CommandTable {
    index: HashMap<(Resource, &'static str), &'static CommandSpec>,
}

static BUILTIN: Lazy<CommandTable> = Lazy::new(|| CommandTable::new(COMMANDS));

impl CommandTable {
    pub fn new(specs: &'static [CommandSpec]) -> Self {
        let index = specs
            .iter()
            .map(|spec| ((spec.resource, spec.verb), spec))
            .collect();
        Self { index }
    }

    /// The table behind the CLI
    pub fn builtin() -> &'static CommandTable {
        &BUILTIN
    }

    pub fn lookup(&self, resource: Resource, verb: &str) -> Option<&'static CommandSpec> {
        let index: &HashMap<(Resource, &str), &'static CommandSpec> = &self.index;
        index.get(&(resource, verb)).copied()
    }

    /// All entries, ordered by resource then verb
    pub fn specs(&self) -> Vec<&'static CommandSpec> {
        let mut specs: Vec<_> = self.index.values().copied().collect();
        specs.sort_by_key(|spec| (spec.resource, spec.verb));
        specs
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
