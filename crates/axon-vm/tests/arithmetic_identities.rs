//! Property tests for spec §8's integer arithmetic identities.

use axon_compile::compile;
use axon_lex::Lexer;
use axon_par::Parser;
use axon_util::Symbol;
use axon_vm::{Value, VM};
use proptest::prelude::*;

fn eval_global(src: &str, name: &str) -> Value {
    let tokens = Lexer::tokenize(src).unwrap();
    let program = Parser::new(tokens).parse_program().unwrap();
    let code = compile(&program).unwrap();
    let mut vm = VM::new();
    vm.push_frame(code);
    vm.run().unwrap();
    vm.get_global(Symbol::intern(name)).unwrap()
}

proptest! {
    #[test]
    fn add_then_subtract_is_identity(a in -100_000i64..100_000, b in -100_000i64..100_000) {
        let src = format!("let r = (({a}) + ({b})) - ({b});");
        prop_assert_eq!(eval_global(&src, "r"), Value::Int(a));
    }

    #[test]
    fn multiply_by_one_is_identity(a in -100_000i64..100_000) {
        let src = format!("let r = ({a}) * 1;");
        prop_assert_eq!(eval_global(&src, "r"), Value::Int(a));
    }
}
