// ==========================================
// LotAllocator 分批引擎测试
// ==========================================
// 测试目标: 验证贪心分批的数量守恒、批量上限、批次号连续性与溢出上报
// ==========================================

use footwear_lot_planner::config::{AllocationConfig, SizeCurve};
use footwear_lot_planner::domain::{LotCell, ProductType};
use footwear_lot_planner::engine::LotAllocator;
use std::collections::BTreeMap;

fn default_allocator() -> LotAllocator {
    LotAllocator::new(AllocationConfig::default())
}

/// 每个轮次的批次号列表
fn lot_numbers_by_round(lots: &[LotCell]) -> BTreeMap<u32, Vec<u32>> {
    let mut map: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
    for lot in lots {
        map.entry(lot.round).or_default().push(lot.lot_number);
    }
    map
}

// ==========================================
// 数量守恒与批量上限
// ==========================================

#[test]
fn test_quantities_sum_to_total_within_ceiling() {
    let allocator = default_allocator();

    for product_type in ProductType::ALL {
        let ceiling = allocator.capacity_ceiling(product_type).unwrap() as u32;
        for total in [1, 19, 20, 21, 45, 239, 240, 241, 777, ceiling - 1, ceiling] {
            let plan = allocator.allocate(total, product_type).unwrap();
            let sum: u32 = plan.lots.iter().map(|l| l.quantity).sum();
            assert_eq!(sum, total, "{} 双 ({}) 分配总量不守恒", total, product_type);
            assert_eq!(plan.allocated_pairs, total);
            assert_eq!(plan.unplaced_pairs, 0);
        }
    }
}

#[test]
fn test_every_lot_within_capacity() {
    let allocator = default_allocator();
    let plan = allocator.allocate(1013, ProductType::Women).unwrap();

    assert!(!plan.lots.is_empty());
    for lot in &plan.lots {
        assert!(lot.quantity > 0, "批次双数必须大于0: {:?}", lot);
        assert!(lot.quantity <= 20, "批次双数超过批量: {:?}", lot);
    }
}

#[test]
fn test_lot_numbers_contiguous_per_round() {
    let allocator = default_allocator();
    let plan = allocator.allocate(700, ProductType::Men).unwrap();

    let by_round = lot_numbers_by_round(&plan.lots);
    assert_eq!(by_round.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    for (round, numbers) in by_round {
        let expected: Vec<u32> = (1..=numbers.len() as u32).collect();
        assert_eq!(numbers, expected, "轮次{}批次号不连续", round);
    }
}

#[test]
fn test_exact_multiple_produces_full_lots_only() {
    let allocator = default_allocator();

    for n in [1u32, 5, 12, 13, 30] {
        let plan = allocator.allocate(20 * n, ProductType::Men).unwrap();
        assert_eq!(plan.lots.len(), n as usize);
        assert!(plan.lots.iter().all(|l| l.quantity == 20));
    }
}

#[test]
fn test_remainder_lands_in_single_partial_lot_after_full_lots() {
    let allocator = default_allocator();
    // 12 个满批填满第 1 轮，余数落在第 2 轮第 1 批
    let plan = allocator.allocate(20 * 12 + 7, ProductType::Women).unwrap();

    assert_eq!(plan.lots.len(), 13);
    let (full, last) = plan.lots.split_at(12);
    assert!(full.iter().all(|l| l.quantity == 20 && l.round == 1));
    assert_eq!(last[0], LotCell::new(2, 1, "4", 7));
}

// ==========================================
// 尺码曲线
// ==========================================

#[test]
fn test_default_men_curve_order() {
    let allocator = default_allocator();
    let plan = allocator.allocate(240, ProductType::Men).unwrap();

    let sizes: Vec<&str> = plan.lots.iter().map(|l| l.size_label.as_str()).collect();
    assert_eq!(
        sizes,
        vec!["7", "7x", "8x", "8x", "9x", "9x", "9x", "10", "10", "11", "11", "12"]
    );
}

#[test]
fn test_default_women_curve_order() {
    let allocator = default_allocator();
    let plan = allocator.allocate(240, ProductType::Women).unwrap();

    let sizes: Vec<&str> = plan.lots.iter().map(|l| l.size_label.as_str()).collect();
    assert_eq!(
        sizes,
        vec!["4", "4x", "5", "5", "5", "6", "6", "6", "7", "7", "7x", "8x"]
    );
}

#[test]
fn test_45_pairs_on_three_size_curve() {
    let mut config = AllocationConfig::default();
    config.size_labels = vec!["s1".into(), "s2".into(), "s3".into()];
    config.curves.insert(
        ProductType::Women,
        SizeCurve::from_parallel(&["s1", "s2", "s3"], &[1, 1, 1]).unwrap(),
    );
    let allocator = LotAllocator::new(config);

    let plan = allocator.allocate(45, ProductType::Women).unwrap();
    assert_eq!(
        plan.lots,
        vec![
            LotCell::new(1, 1, "s1", 20),
            LotCell::new(1, 2, "s2", 20),
            LotCell::new(1, 3, "s3", 5),
        ]
    );
    assert_eq!(plan.rounds_used(), vec![1]);
}

// ==========================================
// 溢出上报
// ==========================================

#[test]
fn test_demand_beyond_ceiling_is_reported() {
    let allocator = default_allocator();
    let ceiling = allocator.capacity_ceiling(ProductType::Men).unwrap() as u32;
    assert_eq!(ceiling, 1200);

    let plan = allocator.allocate(ceiling + 35, ProductType::Men).unwrap();
    assert_eq!(plan.allocated_pairs, ceiling);
    assert_eq!(plan.unplaced_pairs, 35);
    assert!(!plan.is_fully_placed());
    assert_eq!(plan.rounds_used(), vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_custom_capacity_and_rounds() {
    let mut config = AllocationConfig::default();
    config.lot_capacity = 12;
    config.round_count = 2;
    let allocator = LotAllocator::new(config);

    // 每轮 12 个批次 × 12 双 = 144 双，两轮 288 双
    let plan = allocator.allocate(300, ProductType::Men).unwrap();
    assert_eq!(plan.allocated_pairs, 288);
    assert_eq!(plan.unplaced_pairs, 12);
    assert!(plan.lots.iter().all(|l| l.quantity == 12));
}
