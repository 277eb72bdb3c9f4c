//! Plan validation and category roll-up.

use std::collections::HashMap;

use fundtrack_shared::types::{BudgetPlanId, Money, PlanItemId};

use super::error::PlanError;
use super::types::{PlanCategory, PlanItem, PlanItemInput, PlanNode};
use crate::project::clean_optional;

/// Flattened, validated plan lines ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolledUpPlan {
    /// Every line, parents before their children.
    pub items: Vec<PlanItem>,
    /// Sum of the root amounts.
    pub total: Money,
}

/// Budget plan rules.
pub struct PlanService;

impl PlanService {
    /// Trims and checks a plan name.
    pub fn validate_name(name: &str) -> Result<String, PlanError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PlanError::EmptyName);
        }
        Ok(name.to_string())
    }

    /// Validates a line tree and computes every amount.
    ///
    /// A leaf is `unit_price × quantity`; a line with children is the sum of
    /// its children. A line without a category takes it from its
    /// subcategory, or else from its parent.
    pub fn roll_up(
        plan_id: BudgetPlanId,
        roots: &[PlanItemInput],
    ) -> Result<RolledUpPlan, PlanError> {
        let mut items = Vec::new();
        let mut total = Money::ZERO;
        for (position, input) in roots.iter().enumerate() {
            let amount = Self::roll_up_node(plan_id, None, position, None, input, &mut items)?;
            total = checked_add(total, amount, &input.name)?;
        }
        Ok(RolledUpPlan { items, total })
    }

    fn roll_up_node(
        plan_id: BudgetPlanId,
        parent_id: Option<PlanItemId>,
        position: usize,
        inherited: Option<PlanCategory>,
        input: &PlanItemInput,
        out: &mut Vec<PlanItem>,
    ) -> Result<Money, PlanError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(PlanError::EmptyItemName);
        }
        if input.unit_price.is_negative() {
            return Err(PlanError::NegativeUnitPrice(name.to_string()));
        }
        let category = match (input.category, input.subcategory) {
            (Some(category), Some(sub)) if sub.category() != category => {
                return Err(PlanError::SubcategoryMismatch {
                    subcategory: sub,
                    category,
                });
            }
            (Some(category), _) => Some(category),
            (None, Some(sub)) => Some(sub.category()),
            (None, None) => inherited,
        };

        let id = PlanItemId::new();
        let index = out.len();
        out.push(PlanItem {
            id,
            plan_id,
            parent_id,
            position: u32::try_from(position).unwrap_or(u32::MAX),
            category,
            subcategory: input.subcategory,
            name: name.to_string(),
            specification: clean_optional(input.specification.clone()),
            unit_price: input.unit_price,
            quantity: input.quantity,
            amount: Money::ZERO,
            remarks: clean_optional(input.remarks.clone()),
        });

        let amount = if input.children.is_empty() {
            input
                .unit_price
                .fen()
                .checked_mul(i64::from(input.quantity))
                .map(Money::from_fen)
                .ok_or_else(|| PlanError::Overflow(name.to_string()))?
        } else {
            let mut sum = Money::ZERO;
            for (child_position, child) in input.children.iter().enumerate() {
                let child_amount =
                    Self::roll_up_node(plan_id, Some(id), child_position, category, child, out)?;
                sum = checked_add(sum, child_amount, name)?;
            }
            sum
        };
        out[index].amount = amount;
        Ok(amount)
    }

    /// Rebuilds the line tree from stored lines, siblings in position order.
    ///
    /// Lines whose parent is missing are treated as roots.
    #[must_use]
    pub fn build_tree(items: &[PlanItem]) -> Vec<PlanNode> {
        let mut children: HashMap<Option<PlanItemId>, Vec<&PlanItem>> = HashMap::new();
        for item in items {
            let parent = item
                .parent_id
                .filter(|p| items.iter().any(|candidate| candidate.id == *p));
            children.entry(parent).or_default().push(item);
        }
        for siblings in children.values_mut() {
            siblings.sort_by_key(|item| item.position);
        }

        attach(None, &children)
    }
}

// Lines on a parent cycle never hang below a root, so recursion terminates.
fn attach(
    parent: Option<PlanItemId>,
    children: &HashMap<Option<PlanItemId>, Vec<&PlanItem>>,
) -> Vec<PlanNode> {
    children
        .get(&parent)
        .map(|siblings| {
            siblings
                .iter()
                .map(|item| PlanNode {
                    item: (*item).clone(),
                    children: attach(Some(item.id), children),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn checked_add(a: Money, b: Money, name: &str) -> Result<Money, PlanError> {
    a.checked_add(b)
        .ok_or_else(|| PlanError::Overflow(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::PlanSubcategory;
    use rust_decimal_macros::dec;

    fn leaf(
        name: &str,
        sub: Option<PlanSubcategory>,
        price_wan: &str,
        quantity: u32,
    ) -> PlanItemInput {
        PlanItemInput {
            category: None,
            subcategory: sub,
            name: name.to_string(),
            specification: None,
            unit_price: Money::from_wan(price_wan.parse().unwrap()).unwrap(),
            quantity,
            remarks: None,
            children: vec![],
        }
    }

    fn group(
        name: &str,
        category: Option<PlanCategory>,
        children: Vec<PlanItemInput>,
    ) -> PlanItemInput {
        PlanItemInput {
            category,
            children,
            ..leaf(name, None, "0", 0)
        }
    }

    #[test]
    fn test_roll_up_amounts() {
        let plan_id = BudgetPlanId::new();
        let roots = vec![
            group(
                "Direct",
                Some(PlanCategory::Direct),
                vec![
                    leaf("Spectrometer", Some(PlanSubcategory::Equipment), "12.5", 2),
                    group(
                        "Consumables",
                        None,
                        vec![
                            leaf("Reagent kit", Some(PlanSubcategory::Material), "0.35", 10),
                            leaf("Tips", Some(PlanSubcategory::Material), "0.012", 5),
                        ],
                    ),
                ],
            ),
            leaf("Management fee", Some(PlanSubcategory::Management), "3", 1),
        ];

        let plan = PlanService::roll_up(plan_id, &roots).unwrap();
        assert_eq!(plan.items.len(), 6);
        // 25 + (3.5 + 0.06) + 3
        assert_eq!(plan.total.wan(), dec!(31.56));

        let direct = &plan.items[0];
        assert_eq!(direct.amount.wan(), dec!(28.56));
        let consumables = plan.items.iter().find(|i| i.name == "Consumables").unwrap();
        assert_eq!(consumables.parent_id, Some(direct.id));
        assert_eq!(consumables.category, Some(PlanCategory::Direct));
        assert_eq!(consumables.amount.wan(), dec!(3.56));
        assert_eq!(consumables.position, 1);
        let fee = plan.items.last().unwrap();
        assert_eq!(fee.category, Some(PlanCategory::Indirect));
        assert!(plan.items.iter().all(|i| i.plan_id == plan_id));
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(
            PlanService::validate_name(" 2025 application "),
            Ok("2025 application".to_string())
        );
        assert_eq!(PlanService::validate_name(""), Err(PlanError::EmptyName));
    }

    #[test]
    fn test_group_ignores_own_unit_price() {
        let mut parent = group("Travel", None, vec![leaf("Flights", None, "0.2", 3)]);
        parent.unit_price = Money::from_fen(1_000_000);
        parent.quantity = 9;
        let plan = PlanService::roll_up(BudgetPlanId::new(), &[parent]).unwrap();
        assert_eq!(plan.total.wan(), dec!(0.6));
    }

    #[test]
    fn test_rejects_mismatched_subcategory() {
        let mut item = leaf("Bonus", Some(PlanSubcategory::Performance), "1", 1);
        item.category = Some(PlanCategory::Direct);
        assert_eq!(
            PlanService::roll_up(BudgetPlanId::new(), &[item]),
            Err(PlanError::SubcategoryMismatch {
                subcategory: PlanSubcategory::Performance,
                category: PlanCategory::Direct,
            })
        );
    }

    #[test]
    fn test_rejects_blank_name_and_negative_price() {
        let blank = leaf("  ", None, "1", 1);
        assert_eq!(
            PlanService::roll_up(BudgetPlanId::new(), &[blank]),
            Err(PlanError::EmptyItemName)
        );
        let negative = leaf("Refund", None, "-1", 1);
        assert!(matches!(
            PlanService::roll_up(BudgetPlanId::new(), &[negative]),
            Err(PlanError::NegativeUnitPrice(_))
        ));
    }

    #[test]
    fn test_build_tree_round_trip() {
        let roots = vec![
            group("A", None, vec![leaf("A1", None, "1", 1), leaf("A2", None, "2", 1)]),
            leaf("B", None, "3", 1),
        ];
        let mut items = PlanService::roll_up(BudgetPlanId::new(), &roots).unwrap().items;
        items.reverse();

        let tree = PlanService::build_tree(&items);
        let names: Vec<&str> = tree.iter().map(|n| n.item.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        let children: Vec<&str> = tree[0].children.iter().map(|n| n.item.name.as_str()).collect();
        assert_eq!(children, vec!["A1", "A2"]);
    }

    #[test]
    fn test_subcategory_maps_to_budget_category() {
        use crate::budget::BudgetCategory;
        assert_eq!(PlanSubcategory::Labor.budget_category(), BudgetCategory::Labor);
        assert_eq!(PlanSubcategory::Performance.budget_category(), BudgetCategory::Indirect);
        assert_eq!(PlanSubcategory::ALL.len(), 11);
    }
}
