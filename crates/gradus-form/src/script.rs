//! Request rendering.
//!
//! A request is one self-contained batch program: header declarations,
//! one numbered local assignment per term, their sum, a fixed contraction
//! block, the recorded field directives, the optional index summation and
//! renumbering steps, a sqrt normalization loop, and a print directive.

use chrono::Local;
use gradus_braket::Braket;
use gradus_core::Algebra;

use crate::config::FormConfig;
use crate::field::FieldTable;

pub(crate) fn render_request(
    expr: &Braket,
    fields: &FieldTable,
    config: &FormConfig,
    alg: &Algebra,
) -> String {
    let mut out = String::new();
    out.push_str("#-\n");
    banner(&mut out);
    out.push_str("*\n*\n");
    out.push_str(&format!("Dimension {};\n", alg.half_dim()));
    out.push_str("format 255;\n");
    out.push_str("CFunction sqrt;\n");
    out.push_str("Symbols y,z;\n");
    if let Some(line) = fields.functions_line() {
        out.push_str(&line);
        out.push('\n');
    }
    let indices = alg.registry().distinct_non_numeric();
    if !indices.is_empty() {
        out.push_str(&format!("Indices {};\n", indices.join(", ")));
    }
    out.push_str("Off statistics;\n");
    out.push_str("*\n");

    if expr.is_empty() {
        out.push_str("Local R1 = 0;\n");
    } else {
        for (k, term) in expr.terms().iter().enumerate() {
            out.push_str(&format!(
                "Local R{} = {};\n",
                k + 1,
                term.render(alg.registry())
            ));
        }
    }
    out.push_str("*\n");
    out.push_str("Local R =\n");
    out.push_str(&format!("          #do ii = 1, {}\n", expr.len().max(1)));
    out.push_str("                    + R`ii'\n");
    out.push_str("          #enddo\n");
    out.push_str(";\n");
    out.push_str("*\n");
    for _ in 0..7 {
        out.push_str("contract;\n");
    }
    out.push_str("*\n");
    for line in fields.directives() {
        out.push_str(line);
        out.push('\n');
    }
    out.push('\n');
    if config.index_sum_on() && !indices.is_empty() {
        out.push_str(&format!("sum {};\n", indices.join(", ")));
        let literals: Vec<String> = (1..=alg.half_dim()).map(|i| i.to_string()).collect();
        out.push_str(&format!("id e_({})=1;\n", literals.join(",")));
    }
    if config.renumber_on() {
        out.push_str("renumber 1;\n");
    }
    out.push_str("repeat;\n");
    out.push_str("  id 1/(sqrt(y?)) = sqrt(1/y);\n");
    out.push_str("  id sqrt(y?)*sqrt(z?) = sqrt(y*z);\n");
    out.push_str("endrepeat;\n");
    out.push_str(if config.itemized_on() {
        "print +s;\n"
    } else {
        "print R;\n"
    });
    out.push_str(".end\n");
    out
}

fn banner(out: &mut String) {
    let stamp = Local::now().format("%Y-%m-%d.%X");
    out.push_str("**********************************************************************\n");
    out.push_str("*                                                                    *\n");
    out.push_str("*                        gradus CAR algebra                          *\n");
    out.push_str("*                           FORM PROGRAM                             *\n");
    out.push_str(&format!(
        "*                       {stamp}                          *\n"
    ));
    out.push_str("**********************************************************************\n");
}
