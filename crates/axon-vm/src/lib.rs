//! axon-vm — executes a [`axon_compile::CodeObject`] (spec §4.4).

mod error;
mod frame;
mod value;
mod vm;

pub use error::RuntimeError;
pub use frame::Frame;
pub use value::{FunctionValue, HostFn, Key, Value};
pub use vm::{VmOptions, VM};

#[cfg(test)]
mod tests {
    use super::*;
    use axon_compile::compile;
    use axon_lex::Lexer;
    use axon_par::Parser;
    use axon_util::Symbol;

    fn run_src(src: &str) -> VM {
        let tokens = Lexer::tokenize(src).unwrap();
        let program = Parser::new(tokens).parse_program().unwrap();
        let code = compile(&program).unwrap();
        let mut vm = VM::new();
        vm.push_frame(code);
        vm.run().unwrap();
        vm
    }

    #[test]
    fn name_persists_across_statements_on_the_same_vm() {
        let vm = run_src("let x = 5 + 5;");
        assert_eq!(vm.get_global(Symbol::intern("x")), Some(Value::Int(10)));
    }

    #[test]
    fn while_false_never_runs_its_body() {
        let vm = run_src("let ran = false; while (false) { ran = true; }");
        assert_eq!(
            vm.get_global(Symbol::intern("ran")),
            Some(Value::Bool(false))
        );
    }

    #[test]
    fn if_else_executes_exactly_one_branch() {
        let vm = run_src("let x = 0; if (true) { x = 1; } else { x = 2; }");
        assert_eq!(vm.get_global(Symbol::intern("x")), Some(Value::Int(1)));
    }

    #[test]
    fn short_circuit_and_skips_the_right_operand() {
        // If `and` were eager, calling the undefined `boom()` would raise
        // NameError/CallOfNonFunction. Short-circuiting must skip it.
        let vm = run_src("let x = false and boom();");
        assert_eq!(vm.get_global(Symbol::intern("x")), Some(Value::Bool(false)));
    }

    #[test]
    fn short_circuit_or_skips_the_right_operand() {
        let vm = run_src("let x = true or boom();");
        assert_eq!(vm.get_global(Symbol::intern("x")), Some(Value::Bool(true)));
    }

    #[test]
    fn function_call_does_not_leak_params_into_globals() {
        let vm = run_src("fn id(a) { return a; } let y = id(42);");
        assert_eq!(vm.get_global(Symbol::intern("y")), Some(Value::Int(42)));
        assert_eq!(vm.get_global(Symbol::intern("a")), None);
    }

    #[test]
    fn return_outside_function_is_an_error() {
        let tokens = Lexer::tokenize("return 1;").unwrap();
        let program = Parser::new(tokens).parse_program().unwrap();
        let code = compile(&program).unwrap();
        let mut vm = VM::new();
        vm.push_frame(code);
        assert!(matches!(
            vm.run(),
            Err(RuntimeError::ReturnOutsideFunction(_))
        ));
    }

    #[test]
    fn division_by_zero_is_a_type_error() {
        let tokens = Lexer::tokenize("let x = 1 / 0;").unwrap();
        let program = Parser::new(tokens).parse_program().unwrap();
        let code = compile(&program).unwrap();
        let mut vm = VM::new();
        vm.push_frame(code);
        assert!(matches!(vm.run(), Err(RuntimeError::TypeError(_))));
    }

    #[test]
    fn break_exits_the_nearest_loop() {
        let vm = run_src("let x = 0; while (true) { x = x + 1; if (x == 3) { break; } }");
        assert_eq!(vm.get_global(Symbol::intern("x")), Some(Value::Int(3)));
    }

    #[test]
    fn for_loop_sums_a_half_open_range() {
        let vm = run_src("let s = 0; for i = 0; 5 { s = s + i; }");
        assert_eq!(vm.get_global(Symbol::intern("s")), Some(Value::Int(10)));
    }

    #[test]
    fn list_and_dict_index_reads_back_values() {
        let vm = run_src(r#"let a = [10,20,30]; let first = a[0]; let d = {"k": 7}; let v = d["k"];"#);
        assert_eq!(vm.get_global(Symbol::intern("first")), Some(Value::Int(10)));
        assert_eq!(vm.get_global(Symbol::intern("v")), Some(Value::Int(7)));
    }

    #[test]
    fn globals_survive_a_failed_run() {
        let mut vm = VM::new();
        let tokens = Lexer::tokenize("let x = 1;").unwrap();
        let program = Parser::new(tokens).parse_program().unwrap();
        vm.push_frame(compile(&program).unwrap());
        vm.run().unwrap();

        let tokens = Lexer::tokenize("return 2;").unwrap();
        let program = Parser::new(tokens).parse_program().unwrap();
        vm.push_frame(compile(&program).unwrap());
        assert!(vm.run().is_err());

        assert_eq!(vm.get_global(Symbol::intern("x")), Some(Value::Int(1)));
    }
}
