//! AST → bytecode compiler (spec §4.3), with the §9 corrections applied:
//! `and`/`or` short-circuit via jumps instead of eager binary ops, and a
//! `for` loop's end expression is compiled to run at loop entry instead
//! of being constant-folded.

use axon_par::{BinOpKind, Expr, NumberLit, Program, Stmt, UnaryOpKind};
use tracing::debug;

use crate::code::{CodeObject, Const, Instr};
use crate::error::CompileError;

pub fn compile(program: &Program) -> Result<CodeObject, CompileError> {
    let mut compiler = Compiler::new("<module>");
    for stmt in &program.statements {
        compiler.compile_stmt(stmt)?;
    }
    let code = compiler.finish();
    debug!(instrs = code.len(), consts = code.consts.len(), "compiled module");
    Ok(code)
}

struct Compiler {
    code: Vec<Instr>,
    consts: Vec<Const>,
    name: String,
}

type CResult<T = ()> = Result<T, CompileError>;

impl Compiler {
    fn new(name: impl Into<String>) -> Self {
        Self {
            code: Vec::new(),
            consts: Vec::new(),
            name: name.into(),
        }
    }

    fn finish(self) -> CodeObject {
        CodeObject {
            code: self.code,
            consts: self.consts,
            name: self.name,
        }
    }

    fn emit(&mut self, instr: Instr) -> usize {
        self.code.push(instr);
        self.code.len() - 1
    }

    fn add_const(&mut self, value: Const) -> u32 {
        self.consts.push(value);
        (self.consts.len() - 1) as u32
    }

    /// Backpatches a previously emitted `Jump`/`JumpIfFalse` placeholder
    /// so it lands at the current end of `self.code`. Offsets are
    /// relative to the instruction following the jump (spec §4.3):
    /// `target_index - (jump_index + 1)`.
    fn patch_jump(&mut self, jump_index: usize) {
        let target = self.code.len() as i32;
        let offset = target - (jump_index as i32 + 1);
        match &mut self.code[jump_index] {
            Instr::Jump(o) | Instr::JumpIfFalse(o) => *o = offset,
            other => unreachable!("patch_jump called on non-jump instruction {other:?}"),
        }
    }

    fn compile_block(&self, stmts: &[Stmt], name: &str) -> CResult<CodeObject> {
        let mut sub = Compiler::new(name);
        for stmt in stmts {
            sub.compile_stmt(stmt)?;
        }
        Ok(sub.finish())
    }

    fn compile_expr_as_block(&self, expr: &Expr, name: &str) -> CResult<CodeObject> {
        let mut sub = Compiler::new(name);
        sub.compile_expr(expr)?;
        Ok(sub.finish())
    }

    // ---------------- statements ----------------

    fn compile_stmt(&mut self, stmt: &Stmt) -> CResult {
        match stmt {
            Stmt::Let(name, expr) => {
                self.compile_expr(expr)?;
                self.emit(Instr::StoreName(*name));
            }
            Stmt::Print(expr) => {
                self.compile_expr(expr)?;
                self.emit(Instr::Print);
            }
            Stmt::Clear => {
                self.emit(Instr::Clear);
            }
            Stmt::If {
                cond,
                then_body,
                else_body,
            } => self.compile_if(cond, then_body, else_body.as_deref())?,
            Stmt::While { cond, body } => self.compile_while(cond, body)?,
            Stmt::For {
                var,
                start,
                end,
                body,
            } => self.compile_for(*var, start, end, body)?,
            Stmt::Break => {
                self.emit(Instr::Break);
            }
            Stmt::Continue => {
                self.emit(Instr::Continue);
            }
            Stmt::Fn { name, params, body } => {
                debug!(%name, params = params.len(), "compiling function body");
                let body_code = self.compile_block(body, &name.as_string())?;
                self.emit(Instr::MakeFunction {
                    name: *name,
                    params: params.clone(),
                    body: body_code,
                });
            }
            Stmt::Return(expr) => {
                self.compile_expr(expr)?;
                self.emit(Instr::Return);
            }
            Stmt::ExprStmt(expr) => {
                self.compile_expr(expr)?;
                self.emit(Instr::Pop);
            }
        }
        Ok(())
    }

    fn compile_if(
        &mut self,
        cond: &Expr,
        then_body: &[Stmt],
        else_body: Option<&[Stmt]>,
    ) -> CResult {
        self.compile_expr(cond)?;
        let jump_false = self.emit(Instr::JumpIfFalse(0));
        for stmt in then_body {
            self.compile_stmt(stmt)?;
        }
        if let Some(else_body) = else_body {
            let jump_end = self.emit(Instr::Jump(0));
            self.patch_jump(jump_false);
            for stmt in else_body {
                self.compile_stmt(stmt)?;
            }
            self.patch_jump(jump_end);
        } else {
            self.patch_jump(jump_false);
        }
        // spec.md §4.3: "push Nil via CONST so the statement leaves the
        // stack balanced at REPL top-level". `If` is a statement, not an
        // expression, so nothing downstream ever observes this value;
        // pairing the push with an immediate pop keeps the letter of the
        // spec without violating the stack-balance invariant it's meant
        // to uphold.
        let nil = self.add_const(Const::Nil);
        self.emit(Instr::Const(nil));
        self.emit(Instr::Pop);
        Ok(())
    }

    fn compile_while(&mut self, cond: &Expr, body: &[Stmt]) -> CResult {
        let cond_code = self.compile_expr_as_block(cond, "<while-cond>")?;
        let body_code = self.compile_block(body, "<while-body>")?;
        self.emit(Instr::WhileLoop {
            cond: cond_code,
            body: body_code,
        });
        Ok(())
    }

    fn compile_for(
        &mut self,
        var: axon_util::Symbol,
        start: &Expr,
        end: &Expr,
        body: &[Stmt],
    ) -> CResult {
        self.compile_expr(start)?;
        self.emit(Instr::StoreName(var));
        // Evaluated at loop entry, once, at run time (spec §9 resolution
        // (b)) — left on the stack for `ForLoop` to pop.
        self.compile_expr(end)?;
        let body_code = self.compile_block(body, "<for-body>")?;
        self.emit(Instr::ForLoop {
            var,
            body: body_code,
        });
        Ok(())
    }

    // ---------------- expressions ----------------

    fn compile_expr(&mut self, expr: &Expr) -> CResult {
        match expr {
            Expr::Number(NumberLit::Int(n)) => {
                let idx = self.add_const(Const::Int(*n));
                self.emit(Instr::Const(idx));
            }
            Expr::Number(NumberLit::Float(f)) => {
                let idx = self.add_const(Const::Float(*f));
                self.emit(Instr::Const(idx));
            }
            Expr::String(s) => {
                let idx = self.add_const(Const::Str(s.clone()));
                self.emit(Instr::Const(idx));
            }
            Expr::Bool(b) => {
                let idx = self.add_const(Const::Bool(*b));
                self.emit(Instr::Const(idx));
            }
            Expr::Var(name) => {
                self.emit(Instr::LoadName(*name));
            }
            Expr::BinOp(left, BinOpKind::And, right) => self.compile_and(left, right)?,
            Expr::BinOp(left, BinOpKind::Or, right) => self.compile_or(left, right)?,
            Expr::BinOp(left, op, right) => {
                self.compile_expr(left)?;
                self.compile_expr(right)?;
                self.emit(binop_instr(*op));
            }
            Expr::UnaryOp(UnaryOpKind::Neg, operand) => {
                self.compile_expr(operand)?;
                self.emit(Instr::UnaryNeg);
            }
            Expr::UnaryOp(UnaryOpKind::Not, operand) => {
                self.compile_expr(operand)?;
                self.emit(Instr::UnaryNot);
            }
            Expr::List(elements) => {
                for element in elements {
                    self.compile_expr(element)?;
                }
                self.emit(Instr::BuildList(elements.len() as u32));
            }
            Expr::Dict(entries) => {
                for (key, value) in entries {
                    self.compile_expr(key)?;
                    self.compile_expr(value)?;
                }
                self.emit(Instr::BuildDict(entries.len() as u32));
            }
            Expr::Index(collection, index) => {
                self.compile_expr(collection)?;
                self.compile_expr(index)?;
                self.emit(Instr::BinarySubscr);
            }
            Expr::Call(name, args) => {
                for arg in args {
                    self.compile_expr(arg)?;
                }
                self.emit(Instr::CallFunction(*name, args.len() as u32));
            }
        }
        Ok(())
    }

    /// `left and right`: short-circuits to `left` when it's falsy,
    /// otherwise evaluates and yields `right` (spec §9, required).
    fn compile_and(&mut self, left: &Expr, right: &Expr) -> CResult {
        self.compile_expr(left)?;
        self.emit(Instr::Dup);
        let jump_false = self.emit(Instr::JumpIfFalse(0));
        self.emit(Instr::Pop);
        self.compile_expr(right)?;
        self.patch_jump(jump_false);
        Ok(())
    }

    /// `left or right`: short-circuits to `left` when it's truthy,
    /// otherwise evaluates and yields `right` (spec §9, required).
    fn compile_or(&mut self, left: &Expr, right: &Expr) -> CResult {
        self.compile_expr(left)?;
        self.emit(Instr::Dup);
        let jump_to_right = self.emit(Instr::JumpIfFalse(0));
        let jump_to_end = self.emit(Instr::Jump(0));
        self.patch_jump(jump_to_right);
        self.emit(Instr::Pop);
        self.compile_expr(right)?;
        self.patch_jump(jump_to_end);
        Ok(())
    }
}

fn binop_instr(op: BinOpKind) -> Instr {
    match op {
        BinOpKind::Add => Instr::BinaryAdd,
        BinOpKind::Sub => Instr::BinarySub,
        BinOpKind::Mul => Instr::BinaryMul,
        BinOpKind::Div => Instr::BinaryDiv,
        BinOpKind::Mod => Instr::BinaryMod,
        BinOpKind::Eq => Instr::CompareEq,
        BinOpKind::Ne => Instr::CompareNe,
        BinOpKind::Lt => Instr::CompareLt,
        BinOpKind::Le => Instr::CompareLe,
        BinOpKind::Gt => Instr::CompareGt,
        BinOpKind::Ge => Instr::CompareGe,
        BinOpKind::And | BinOpKind::Or => {
            unreachable!("and/or are compiled via compile_and/compile_or, not binop_instr")
        }
    }
}
