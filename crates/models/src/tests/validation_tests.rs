use rust_decimal::Decimal;

use crate::{company, product, product_sale, user};

#[test]
fn company_requires_all_fields() {
    assert!(company::validate("Acme", "1 Main St", "555-0100").is_ok());
    assert!(company::validate(" ", "1 Main St", "555-0100").is_err());
    assert!(company::validate("Acme", "", "555-0100").is_err());
    assert!(company::validate("Acme", "1 Main St", "\t").is_err());
}

#[test]
fn product_price_must_be_positive() {
    assert!(product::validate("Widget", Decimal::new(1000, 2)).is_ok());
    assert!(product::validate_price(Decimal::ZERO).is_err());
    assert!(product::validate_price(Decimal::new(-1, 0)).is_err());
    assert!(product::validate("", Decimal::ONE).is_err());
}

#[test]
fn sale_amount_and_price_must_be_positive() {
    assert!(product_sale::validate_amount(1).is_ok());
    assert!(product_sale::validate_amount(0).is_err());
    assert!(product_sale::validate_amount(-3).is_err());
    assert!(product_sale::validate_price_per_unit(Decimal::new(1, 2)).is_ok());
    assert!(product_sale::validate_price_per_unit(Decimal::ZERO).is_err());
}

#[test]
fn user_fields_validated() {
    assert!(user::validate_email("jane@example.com").is_ok());
    assert!(user::validate_email("jane.example.com").is_err());
    assert!(user::validate_username("jane").is_ok());
    assert!(user::validate_username("jane doe").is_err());
    assert!(user::validate_username("").is_err());
    assert!(user::validate_name("Jane", "Doe").is_ok());
    assert!(user::validate_name("Jane", " ").is_err());
}

#[test]
fn money_must_fit_two_decimal_places() {
    // 0.004 would be stored as 0.00
    let err = product::validate_price(Decimal::new(4, 3)).unwrap_err();
    assert_eq!(err.to_string(), "validation error: price allows at most 2 decimal places");
    // 10.005 would come back as 10.01
    assert!(product::validate_price(Decimal::new(10005, 3)).is_err());
    assert!(product_sale::validate_price_per_unit(Decimal::new(10005, 3)).is_err());
    // trailing zeros are not extra precision
    assert!(product::validate_price(Decimal::new(12500, 3)).is_ok());
    assert!(product_sale::validate_price_per_unit(Decimal::new(1, 2)).is_ok());
}

#[test]
fn text_wider_than_column_rejected() {
    assert!(company::validate("Acme", "1 Main St", &"5".repeat(company::PHONE_MAX_LEN)).is_ok());
    let err = company::validate("Acme", "1 Main St", &"5".repeat(company::PHONE_MAX_LEN + 1)).unwrap_err();
    assert_eq!(err.to_string(), "validation error: phone longer than 32 characters");
    assert!(company::validate(&"n".repeat(129), "1 Main St", "555").is_err());
    assert!(product::validate(&"w".repeat(product::NAME_MAX_LEN + 1), Decimal::ONE).is_err());
    assert!(user::validate_username(&"u".repeat(user::USERNAME_MAX_LEN + 1)).is_err());
    assert!(user::validate_email(&format!("{}@example.com", "e".repeat(250))).is_err());
    assert!(user::validate_name("Jane", &"d".repeat(user::PERSON_NAME_MAX_LEN + 1)).is_err());
    // width counts characters, not bytes
    assert!(company::validate("Acme", "1 Main St", &"é".repeat(company::PHONE_MAX_LEN)).is_ok());
}
