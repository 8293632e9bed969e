// ==========================================
// 鞋业生产订单系统 - 批次领域模型
// ==========================================
// 批次 = (生产单, 轮次, 批次号) 下按尺码拆分的若干行
// 每行落库为一条 lot_entry 记录
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// LotCell - 批次单元格 (轮次, 批次号, 尺码, 双数)
// ==========================================
// 用途: 分批引擎输出 / 批次表保存 / CSV 回读
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LotCell {
    pub round: u32,
    pub lot_number: u32,
    pub size_label: String,
    pub quantity: u32,
}

impl LotCell {
    pub fn new(round: u32, lot_number: u32, size_label: impl Into<String>, quantity: u32) -> Self {
        Self {
            round,
            lot_number,
            size_label: size_label.into(),
            quantity,
        }
    }
}

// ==========================================
// LotEntry - 已落库的批次行
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotEntry {
    pub lot_entry_id: i64,
    pub order_id: i64,
    pub round: u32,
    pub lot_number: u32,
    pub size_label: String,
    pub quantity: u32,
    /// 落库状态字段（仅有默认值 PENDING，展示状态以 LotSheet 派生为准）
    pub status: String,
}

impl LotEntry {
    /// 转为单元格视图
    pub fn to_cell(&self) -> LotCell {
        LotCell::new(self.round, self.lot_number, self.size_label.clone(), self.quantity)
    }
}

// ==========================================
// AllocationPlan - 初始分批结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationPlan {
    /// 按生成顺序排列的批次（轮次升序，轮内批次号升序）
    pub lots: Vec<LotCell>,
    /// 已分配双数
    pub allocated_pairs: u32,
    /// 超出产能上限未能分配的双数
    pub unplaced_pairs: u32,
}

impl AllocationPlan {
    /// 是否全部分配完毕
    pub fn is_fully_placed(&self) -> bool {
        self.unplaced_pairs == 0
    }

    /// 获得批次的轮次列表（去重、升序）
    pub fn rounds_used(&self) -> Vec<u32> {
        let mut rounds: Vec<u32> = self.lots.iter().map(|l| l.round).collect();
        rounds.dedup();
        rounds
    }
}
