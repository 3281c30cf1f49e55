//! Order validation utilities

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum OrderValidationError {
    #[error("Product cannot be empty")]
    EmptyProduct,

    #[error("Product exceeds maximum length of {0} characters")]
    ProductTooLong(usize),

    #[error("Quantity must be greater than 0, got {0}")]
    InvalidQuantity(i32),

    #[error("Price must be a finite number greater than or equal to 0")]
    InvalidPrice,
}

const MAX_PRODUCT_LENGTH: usize = 255;

pub fn validate_product(product: &str) -> Result<(), OrderValidationError> {
    if product.trim().is_empty() {
        return Err(OrderValidationError::EmptyProduct);
    }

    if product.chars().count() > MAX_PRODUCT_LENGTH {
        return Err(OrderValidationError::ProductTooLong(MAX_PRODUCT_LENGTH));
    }

    Ok(())
}

pub fn validate_quantity(quantity: i32) -> Result<(), OrderValidationError> {
    if quantity <= 0 {
        return Err(OrderValidationError::InvalidQuantity(quantity));
    }

    Ok(())
}

pub fn validate_price(price: f64) -> Result<(), OrderValidationError> {
    if !price.is_finite() || price < 0.0 {
        return Err(OrderValidationError::InvalidPrice);
    }

    Ok(())
}
