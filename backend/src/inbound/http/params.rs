//! Path-parameter parsing returning enveloped errors instead of the
//! framework's default plain-text responses.

use uuid::Uuid;

use crate::domain::{Error, OrderId, ProductId, UserId};

fn parse_uuid(raw: &str, what: &str) -> Result<Uuid, Error> {
    Uuid::parse_str(raw).map_err(|_| Error::invalid_request(format!("Invalid {what} id")))
}

/// Parse a user id path segment.
pub fn user_id(raw: &str) -> Result<UserId, Error> {
    parse_uuid(raw, "user").map(UserId::from_uuid)
}

/// Parse a product id path segment.
pub fn product_id(raw: &str) -> Result<ProductId, Error> {
    parse_uuid(raw, "product").map(ProductId::from_uuid)
}

/// Parse an order id path segment.
pub fn order_id(raw: &str) -> Result<OrderId, Error> {
    parse_uuid(raw, "order").map(OrderId::from_uuid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;

    #[test]
    fn accepts_well_formed_uuids() {
        user_id("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid user id");
    }

    #[test]
    fn rejects_malformed_segments_with_invalid_request() {
        let err = product_id("not-a-uuid").expect_err("malformed id");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message, "Invalid product id");
    }
}
