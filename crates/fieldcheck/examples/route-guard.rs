//! Route guard: validate request bodies against per-route schemas before
//! handing them to a handler.
//!
//! Run with:
//!   cargo run --example route-guard

use fieldcheck::{FieldError, FieldErrorKind, Outcome, SchemaError, SchemaRegistry};

const CREATE_USER: &str = r#"
root:
  email: { required: true, type: string, pattern: "/^[^@]+@[^@]+$/" }
  role: { in: [admin, member] }
  profile: { type: object, schema: profile }
profile:
  display_name: { type: string, min: 1, max: 40 }
  age: { type: int, min: 13, nullable: true }
"#;

fn guard(registry: &SchemaRegistry, route: &str, body: &[u8]) -> Result<Outcome, FieldError> {
    match registry.validate(route, body) {
        Ok(outcome) => Ok(outcome),
        Err(SchemaError::InvalidField(err)) => Err(err),
        Err(err) => Err(FieldError::new(
            FieldErrorKind::InvalidType,
            "",
            format!("unreadable body: {err}"),
        )),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let registry = SchemaRegistry::from_embedded(&[("create_user", CREATE_USER)])?;
    eprintln!("Routes with schemas: {:?}", registry.routes());

    let requests: [(&str, &[u8]); 5] = [
        ("create_user", br#"{"email":"ada@example.com","role":"admin"}"#),
        ("create_user", br#"{"role":"member"}"#),
        ("create_user", br#"{"email":"ada@example.com","role":"owner"}"#),
        (
            "create_user",
            br#"{"email":"ada@example.com","profile":{"display_name":"Ada","age":9}}"#,
        ),
        ("list_users", br#"{"page":2}"#),
    ];

    for (route, body) in requests {
        match guard(&registry, route, body) {
            Ok(outcome) => eprintln!("{route}: accepted ({})", outcome.as_str()),
            Err(err) => eprintln!("{route}: rejected field={:?} {err}", err.field),
        }
    }

    Ok(())
}
