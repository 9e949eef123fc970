
use condmatrix::matrix::merge_outputs;
use condmatrix::{
    ConditionConfig, ConditionEvaluator, Context, EvaluationResult, EvaluatorOptions, LogicalOp,
    Value,
};
use proptest::prelude::*;
use strategies::{arb_config, arb_context, arb_node, GenConfig};

fn eval(gen: &GenConfig, ctx: &Context) -> EvaluationResult {
    ConditionEvaluator::new(ctx.clone()).evaluate_config(&gen.build())
}

fn single(operator: LogicalOp, nodes: Vec<condmatrix::Node>) -> ConditionConfig {
    ConditionConfig::builder()
        .rule("r", |r| r.operator(operator).conditions(nodes))
        .build()
        .unwrap()
}

// ---------------------------------------------------------------------------
// 1. Determinism: same config + same context => same result
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn determinism(gen in arb_config(), ctx in arb_context()) {
        let config = gen.build();
        let evaluator = ConditionEvaluator::new(ctx);
        let first = evaluator.evaluate_config(&config);
        for _ in 0..5 {
            prop_assert_eq!(&evaluator.evaluate_config(&config), &first);
        }
    }

    /// Compiling the JSON form yields the same evaluation as the builder.
    #[test]
    fn json_and_builder_agree(gen in arb_config(), ctx in arb_context()) {
        let from_builder = eval(&gen, &ctx);
        let from_json = ConditionEvaluator::new(ctx)
            .evaluate(&gen.to_json())
            .unwrap();
        prop_assert_eq!(from_builder, from_json);
    }
}

// ---------------------------------------------------------------------------
// 2. Result shape: matched flag, names and merged outputs are consistent
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn matched_iff_any_rule_matched(gen in arb_config(), ctx in arb_context()) {
        let result = eval(&gen, &ctx);
        prop_assert_eq!(result.matched(), !result.matched_conditions().is_empty());
        if !result.matched() {
            prop_assert!(result.outputs().is_empty());
        }
    }

    #[test]
    fn matched_names_follow_declaration_order(gen in arb_config(), ctx in arb_context()) {
        let result = eval(&gen, &ctx);
        let declared: Vec<&str> = gen.rules.iter().map(|r| r.name.as_str()).collect();
        let positions: Vec<usize> = result
            .matched_conditions()
            .iter()
            .map(|name| declared.iter().position(|d| d == name).unwrap())
            .collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn outputs_are_the_shallow_merge_of_matched_rules(gen in arb_config(), ctx in arb_context()) {
        let config = gen.build();
        let result = ConditionEvaluator::new(ctx).evaluate_config(&config);
        let expected = merge_outputs(
            result
                .matched_conditions()
                .iter()
                .map(|name| config.get(name).unwrap().outputs()),
        );
        prop_assert_eq!(result.outputs(), &expected);
    }

    #[test]
    fn evaluate_agrees_with_detailed(gen in arb_config(), ctx in arb_context()) {
        let config = gen.build();
        let evaluator = ConditionEvaluator::new(ctx);
        let report = evaluator.evaluate_detailed(&config);
        prop_assert_eq!(report.result(), &evaluator.evaluate_config(&config));
        prop_assert_eq!(report.outcomes().len(), config.len());

        let matched: Vec<&str> = report
            .outcomes()
            .iter()
            .filter(|o| o.matched)
            .map(|o| o.name.as_str())
            .collect();
        prop_assert_eq!(
            matched,
            report.result().matched_conditions().iter().map(String::as_str).collect::<Vec<_>>()
        );
    }
}

// ---------------------------------------------------------------------------
// 3. Group semantics: and = all children, or = any child, empty = true
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn and_matches_iff_every_child_matches(
        nodes in prop::collection::vec(arb_node(), 1..5),
        ctx in arb_context(),
    ) {
        let evaluator = ConditionEvaluator::new(ctx);
        let each: Vec<bool> = nodes
            .iter()
            .map(|n| evaluator.evaluate_config(&single(LogicalOp::And, vec![n.clone()])).matched())
            .collect();
        let whole = evaluator.evaluate_config(&single(LogicalOp::And, nodes)).matched();
        prop_assert_eq!(whole, each.iter().all(|m| *m));
    }

    #[test]
    fn or_matches_iff_some_child_matches(
        nodes in prop::collection::vec(arb_node(), 1..5),
        ctx in arb_context(),
    ) {
        let evaluator = ConditionEvaluator::new(ctx);
        let each: Vec<bool> = nodes
            .iter()
            .map(|n| evaluator.evaluate_config(&single(LogicalOp::Or, vec![n.clone()])).matched())
            .collect();
        let whole = evaluator.evaluate_config(&single(LogicalOp::Or, nodes)).matched();
        prop_assert_eq!(whole, each.iter().any(|m| *m));
    }

    #[test]
    fn empty_condition_lists_always_match(gen in arb_config(), ctx in arb_context()) {
        let mut gen = gen;
        for rule in &mut gen.rules {
            rule.conditions.clear();
        }
        let result = eval(&gen, &ctx);
        prop_assert!(result.matched());
        prop_assert_eq!(result.matched_conditions().len(), gen.rules.len());

        let all_outputs = merge_outputs(gen.rules.iter().map(|r| &r.outputs));
        prop_assert_eq!(result.outputs(), &all_outputs);
    }

    #[test]
    fn depth_limit_is_enforced(gen in arb_config(), max_depth in 1_usize..4) {
        let options = EvaluatorOptions::default().with_max_depth(max_depth);
        let deepest = gen.build().rules().iter().map(|r| r.condition().depth()).max().unwrap_or(1);
        let compiled = ConditionConfig::from_value(&gen.to_json(), &options);
        prop_assert_eq!(compiled.is_ok(), deepest <= max_depth);
    }
}

#[test]
fn json_form_of_generated_config_is_an_object() {
    let gen = GenConfig { rules: Vec::new() };
    assert_eq!(gen.to_json(), Value::Object(condmatrix::Map::new()));
}
