use mathpad_rs::Evaluator;

fn main() {
    pretty_env_logger::init();

    let mut evaluator = Evaluator::new();

    let expressions = [
        "2 + 3 * 4",
        "x = 800",
        "x / 16",
        "sqrt(16)(5)",
        "7464.36 - 7391.21",
        "answer [c->f]",
        "min(1,2,3,4)",
        "x = ",
    ];

    for expression in expressions {
        match evaluator.evaluate(expression) {
            Ok(Some(value)) => println!("{expression:<24} = {value}"),
            Ok(None) => println!("{expression:<24} cleared"),
            Err(err) => println!("{expression:<24} ! {err}"),
        }
    }

    println!("\nvariables:");
    let mut variables: Vec<(String, f64)> = evaluator
        .variables()
        .iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect();
    variables.sort_by(|a, b| a.0.cmp(&b.0));
    for (name, value) in variables {
        println!("  {name} = {value}");
    }
}
