// ==========================================
// 鞋业生产订单系统 - 领域类型定义
// ==========================================
// 依据: 生产单录入表单 - 类型下拉框
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 产品类型 (Product Type)
// ==========================================
// 决定初始分批时使用哪条尺码曲线
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductType {
    Men,   // 男款
    Women, // 女款
}

impl ProductType {
    /// 全部产品类型（按表单顺序）
    pub const ALL: [ProductType; 2] = [ProductType::Men, ProductType::Women];

    /// 数据库存储值
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::Men => "MEN",
            ProductType::Women => "WOMEN",
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProductType {
    type Err = String;

    /// 解析产品类型
    ///
    /// 兼容旧库中的葡语标签（Masculino / Feminino）
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "MEN" | "MASCULINO" => Ok(ProductType::Men),
            "WOMEN" | "FEMININO" => Ok(ProductType::Women),
            other => Err(format!("未知的产品类型: {}", other)),
        }
    }
}

// ==========================================
// 批次状态 (Lot Status)
// ==========================================
// 派生状态: 由批次合计与批量容量比较得出，不单独落库维护
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LotStatus {
    Pending,  // 合计未达批量
    Complete, // 合计恰好等于批量
}

impl LotStatus {
    /// 根据批次合计推导状态
    pub fn derive(lot_total: u32, lot_capacity: u32) -> Self {
        if lot_total == lot_capacity {
            LotStatus::Complete
        } else {
            LotStatus::Pending
        }
    }
}

impl fmt::Display for LotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LotStatus::Pending => write!(f, "PENDING"),
            LotStatus::Complete => write!(f, "COMPLETE"),
        }
    }
}
