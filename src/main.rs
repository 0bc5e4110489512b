use std::collections::HashMap;

use clap::Parser;
use equation_parser::{lexer, Equation, ParserConfig};
use miette::LabeledSpan;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Input {
    /// The expression to evaluate, e.g. "2x^2 + sin(x)"
    expression: String,

    /// Bind a variable, as NAME=VALUE. May be repeated.
    #[clap(long = "var", value_parser = parse_binding)]
    vars: Vec<(String, f64)>,

    /// Print the canonical form of the expression instead of evaluating it.
    #[clap(long, default_value = "false")]
    print: bool,

    /// Print the parsed tree instead of evaluating it.
    #[clap(long, default_value = "false")]
    tree: bool,

    /// Debug the lexer, printing out each token. Does not parse the expression.
    #[clap(long, default_value = "false")]
    debug_lexer: bool,

    /// Maximum nesting depth of the expression.
    #[clap(long, default_value_t = ParserConfig::DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Treat adjacency such as "2x" as an error rather than a multiplication.
    #[clap(long, default_value = "false")]
    no_implicit_multiplication: bool,
}

fn parse_binding(s: &str) -> Result<(String, f64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{s}'"))?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid value for '{name}': {e}"))?;
    Ok((name.trim().to_string(), value))
}

fn main() {
    env_logger::init();

    let Input {
        expression,
        vars,
        print,
        tree,
        debug_lexer,
        max_depth,
        no_implicit_multiplication,
    } = Input::parse();

    if debug_lexer {
        let lexer = lexer::Lexer::new(&expression)
            .with_implicit_multiplication(!no_implicit_multiplication);
        let source_code = lexer.get_source_code();

        run_debug_lexer(lexer, source_code);
        return;
    }

    let config = ParserConfig::default()
        .with_max_depth(max_depth)
        .with_implicit_multiplication(!no_implicit_multiplication);

    let equation = match Equation::parse_with(&expression, config) {
        Ok(equation) => equation,
        Err(e) => fail(miette::Report::new(e).with_source_code(expression.clone())),
    };

    if tree {
        println!("{}", equation.render_tree());
        return;
    }

    if print {
        println!("{}", equation.print());
        return;
    }

    let bindings: HashMap<String, f64> = vars.into_iter().collect();
    match equation.evaluate(&bindings) {
        Ok(value) => println!("{value}"),
        Err(e) => fail(miette::Report::new(e)),
    }
}

fn fail(report: miette::Report) -> ! {
    eprintln!("{:?}", report);
    std::process::exit(1);
}

fn run_debug_lexer(lexer: lexer::Lexer, source_code: miette::NamedSource<String>) {
    for token in lexer {
        match token {
            Ok(t) => {
                let diag = miette::miette!(
                    labels = vec![LabeledSpan::at(
                        t.span.start..t.span.end,
                        format!("{:?}", t.kind)
                    )],
                    severity = miette::Severity::Advice,
                    "found a token",
                )
                .with_source_code(source_code.clone());
                eprintln!("{:?}", diag);
            }
            Err(e) => fail(miette::Report::new(e).with_source_code(source_code.clone())),
        }
    }
}
