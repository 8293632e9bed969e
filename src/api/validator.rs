// ==========================================
// 鞋业生产订单系统 - 生产单表单校验
// ==========================================
// 规则: 客户不能为空；生产单号、总双数必须为纯数字；总双数 > 0
// 校验失败时不发生任何写入
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::order::NewOrder;
use crate::domain::types::ProductType;
use serde::{Deserialize, Serialize};

// ==========================================
// OrderForm - 生产单录入表单（原始文本）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderForm {
    pub client_name: String,
    pub order_no: String,
    pub total_pairs: String,
    pub product_type: ProductType,
}

/// 校验表单并转换为待创建生产单
///
/// # 返回
/// - Ok(NewOrder): 校验通过（已去除首尾空白）
/// - Err(ApiError::InvalidInput): 校验失败
pub fn validate_order_form(form: &OrderForm) -> ApiResult<NewOrder> {
    let client_name = form.client_name.trim();
    if client_name.is_empty() {
        return Err(ApiError::InvalidInput("客户不能为空".to_string()));
    }

    let order_no = parse_digits("生产单号", &form.order_no)?;
    let total_pairs = parse_digits("总双数", &form.total_pairs)?;

    if total_pairs == 0 {
        return Err(ApiError::InvalidInput("总双数必须大于0".to_string()));
    }

    let total_pairs = u32::try_from(total_pairs)
        .map_err(|_| ApiError::InvalidInput(format!("总双数过大: {}", total_pairs)))?;
    let order_no = i64::try_from(order_no)
        .map_err(|_| ApiError::InvalidInput(format!("生产单号过大: {}", order_no)))?;

    Ok(NewOrder {
        order_no,
        client_name: client_name.to_string(),
        total_pairs,
        product_type: form.product_type,
    })
}

/// 解析纯数字字段（不接受符号、小数点、空白以外的字符）
fn parse_digits(field: &str, raw: &str) -> ApiResult<u64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(ApiError::InvalidInput(format!("{}必须为数字: {:?}", field, raw)));
    }
    trimmed
        .parse::<u64>()
        .map_err(|e| ApiError::InvalidInput(format!("{}无法解析: {}", field, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(client: &str, order_no: &str, total: &str) -> OrderForm {
        OrderForm {
            client_name: client.to_string(),
            order_no: order_no.to_string(),
            total_pairs: total.to_string(),
            product_type: ProductType::Men,
        }
    }

    #[test]
    fn test_valid_form_is_trimmed() {
        let order = validate_order_form(&form("  Calçados Silva ", " 1001 ", "45")).unwrap();
        assert_eq!(order.client_name, "Calçados Silva");
        assert_eq!(order.order_no, 1001);
        assert_eq!(order.total_pairs, 45);
    }

    #[test]
    fn test_empty_client_rejected() {
        assert!(matches!(
            validate_order_form(&form("   ", "1", "20")),
            Err(ApiError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_non_numeric_fields_rejected() {
        assert!(validate_order_form(&form("A", "12a", "20")).is_err());
        assert!(validate_order_form(&form("A", "12", "-20")).is_err());
        assert!(validate_order_form(&form("A", "12", "2.5")).is_err());
        assert!(validate_order_form(&form("A", "", "20")).is_err());
    }

    #[test]
    fn test_zero_total_rejected() {
        match validate_order_form(&form("A", "12", "0")) {
            Err(ApiError::InvalidInput(msg)) => assert!(msg.contains("大于0")),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }
}
