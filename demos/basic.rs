use condmatrix::matrix::Matrix;
use condmatrix::{any, field, ConditionConfig, ConditionEvaluator, Context, LogicalOp};

fn main() {
    // Define conditions
    let config = ConditionConfig::builder()
        .rule("production", |r| {
            r.when(field("github.ref_name").eq("main"))
                .when(field("github.event_name").eq("push"))
                .output("environment", "production")
                .output("replicas", 3)
        })
        .rule("preview", |r| {
            r.operator(LogicalOp::Or)
                .when(field("labels").contains("preview"))
                .when(any([
                    field("github.ref_name").starts_with("feature/"),
                    field("github.ref_name").starts_with("fix/"),
                ]))
                .output("environment", "preview")
        })
        .build()
        .expect("failed to build conditions");

    println!("{config}");

    // Evaluate against a context
    let ctx = Context::new()
        .set("github.ref_name", "Feature/login")
        .set("github.event_name", "pull_request")
        .set("labels", vec!["ui"]);

    let evaluator = ConditionEvaluator::new(ctx);
    let report = evaluator.evaluate_detailed(&config);
    println!("{report}");

    let matrix = Matrix::from_result(report.result());
    println!("matrix={matrix}");
}
