//! Property test for spec §8: "compile then execute leaves the
//! evaluation stack of every frame empty at frame pop" — checked here at
//! the compile-time level, since the net stack effect of a `CodeObject`
//! is fully determined by its instructions (no opcode effect depends on
//! runtime values).

use axon_compile::{compile, CodeObject, Instr};
use axon_lex::Lexer;
use axon_par::Parser;
use proptest::prelude::*;

fn instr_effect(instr: &Instr) -> i64 {
    match instr {
        Instr::Const(_) | Instr::LoadName(_) | Instr::Dup => 1,
        Instr::BuildList(n) => 1 - *n as i64,
        Instr::BuildDict(n) => 1 - 2 * *n as i64,
        Instr::BinarySubscr => -1,
        Instr::BinaryAdd
        | Instr::BinarySub
        | Instr::BinaryMul
        | Instr::BinaryDiv
        | Instr::BinaryMod
        | Instr::CompareEq
        | Instr::CompareNe
        | Instr::CompareLt
        | Instr::CompareLe
        | Instr::CompareGt
        | Instr::CompareGe
        | Instr::BinaryAnd
        | Instr::BinaryOr => -1,
        Instr::UnaryNeg | Instr::UnaryNot => 0,
        Instr::CallFunction(_, argc) => 1 - *argc as i64,
        Instr::StoreName(_) | Instr::Pop | Instr::Print | Instr::JumpIfFalse(_) => -1,
        Instr::Clear | Instr::Jump(_) | Instr::MakeFunction { .. } | Instr::WhileLoop { .. } => 0,
        Instr::Return => -1,
        Instr::Break | Instr::Continue => 0,
        Instr::ForLoop { .. } => -1,
    }
}

fn net_effect(code: &CodeObject) -> i64 {
    code.code.iter().map(instr_effect).sum()
}

fn compile_src(src: &str) -> CodeObject {
    let tokens = Lexer::tokenize(src).unwrap();
    let program = Parser::new(tokens).parse_program().unwrap();
    compile(&program).unwrap()
}

proptest! {
    #[test]
    fn sequences_of_statements_balance_the_stack(
        numbers in prop::collection::vec(0i64..100, 1..6)
    ) {
        let src: String = numbers
            .iter()
            .enumerate()
            .map(|(i, n)| format!("let v{i} = {n} + {n} * 2;\nprint(v{i});\n"))
            .collect();
        let code = compile_src(&src);
        prop_assert_eq!(net_effect(&code), 0);
    }
}

#[test]
fn each_end_to_end_scenario_balances_the_stack() {
    let programs = [
        "print(1+2*3);",
        "let x = 5; let y = 10; print(x+y);",
        "let s = 0; for i = 0; 5 { s = s + i; } print(s);",
        "fn add(a,b){ return a+b; } print(add(2,3));",
        "let x = 0; while (x < 10) { x = x + 1; if (x == 7) { break; } } print(x);",
        r#"let arr = [1,2,3]; let d = {"a":1,"b":2}; print(arr[1]); print(d["b"]);"#,
    ];
    for src in programs {
        let code = compile_src(src);
        assert_eq!(net_effect(&code), 0, "unbalanced stack for: {src}");
    }
}
