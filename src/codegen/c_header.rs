use std::fmt::Write as _;

use super::{CodegenOptions, MatrixType};
use crate::base::constants::{ADD_DISPATCH, MUL_DISPATCH};

/// Kernels emitted per type, as `<type>_<kernel>`.
pub const KERNELS: [&str; 4] = ["view", "add", "mul", "write"];

/// Identifiers a type name must not take: C keywords plus every name the
/// generated header defines, includes or uses as a local.
pub const RESERVED_NAMES: &[&str] = &[
    // C11 keywords
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double",
    "else", "enum", "extern", "float", "for", "goto", "if", "inline", "int", "long",
    "register", "restrict", "return", "short", "signed", "sizeof", "static", "struct",
    "switch", "typedef", "union", "unsigned", "void", "volatile", "while", "_Alignas",
    "_Alignof", "_Atomic", "_Bool", "_Complex", "_Generic", "_Imaginary", "_Noreturn",
    "_Static_assert", "_Thread_local",
    // header plumbing
    ADD_DISPATCH, MUL_DISPATCH, "EC_REQUIRE", "size_t", "FILE", "NULL", "fprintf",
    "stderr", "abort",
    // kernel parameters and locals
    "a", "b", "out", "m", "n", "data", "stream", "cond", "acc", "i", "j", "k",
];

/// Accumulates the text of one generated header.
pub struct HeaderWriter<'a> {
    options: &'a CodegenOptions,
    out: String,
    indent_level: usize,
}

impl<'a> HeaderWriter<'a> {
    pub fn new(options: &'a CodegenOptions) -> Self {
        Self {
            options,
            out: String::new(),
            indent_level: 0,
        }
    }

    pub fn finish(self) -> String {
        self.out
    }

    pub fn write_unit(&mut self, types: &[MatrixType]) {
        self.write_prelude();
        for ty in types {
            self.write_type(ty);
        }
        if !types.is_empty() {
            self.write_dispatch(ADD_DISPATCH, "add", "a, b, out", types);
            self.write_dispatch(MUL_DISPATCH, "mul", "a, b, out", types);
        }
        self.write_epilogue();
    }

    fn write_prelude(&mut self) {
        let options = self.options;
        let guard = &options.include_guard;
        self.line("/* Generated by ec-porter. Edits are overwritten. */");
        self.line(&format!("#ifndef {guard}"));
        self.line(&format!("#define {guard}"));
        self.blank();
        self.line("#include <stddef.h>");
        self.line("#include <stdio.h>");
        self.line("#include <stdlib.h>");
        self.blank();
        self.line("#ifndef EC_REQUIRE");
        self.line("#define EC_REQUIRE(cond) \\");
        self.line("    do { \\");
        self.line("        if (!(cond)) { \\");
        self.line(
            "            fprintf(stderr, \"%s:%d: shape check failed: %s\\n\", __FILE__, __LINE__, #cond); \\",
        );
        self.line("            abort(); \\");
        self.line("        } \\");
        self.line("    } while (0)");
        self.line("#endif");
        self.blank();
    }

    fn write_epilogue(&mut self) {
        self.line(&format!("#endif /* {} */", self.options.include_guard));
    }

    fn write_type(&mut self, ty: &MatrixType) {
        let name = ty.symbol.as_str();
        let scalar = ty.shape.scalar.c_type();

        self.line(&format!("/* {} */", comment_safe(ty.spec.as_str())));
        self.line(&format!("typedef struct {name} {{"));
        self.indented(|w| {
            w.line("size_t rows;");
            w.line("size_t cols;");
            w.line(&format!("{scalar} *data;"));
        });
        self.line(&format!("}} {name};"));
        self.blank();

        if let Some((rows, cols)) = ty.shape.fixed_size() {
            self.function(&format!("{name} {name}_view({scalar} *data)"), |w| {
                w.line(&format!("{name} m = {{ {rows}, {cols}, data }};"));
                w.line("return m;");
            });
        }

        let binary = format!("const {name} *a, const {name} *b, {name} *out");

        self.function(&format!("void {name}_add({binary})"), |w| {
            w.line("EC_REQUIRE(a->rows == b->rows && a->cols == b->cols);");
            w.line("EC_REQUIRE(out->rows == a->rows && out->cols == a->cols);");
            w.line("size_t n = a->rows * a->cols;");
            w.for_loop("i", "n", |w| {
                w.line("out->data[i] = a->data[i] + b->data[i];");
            });
        });

        self.function(&format!("void {name}_mul({binary})"), |w| {
            w.line("EC_REQUIRE(a->cols == b->rows);");
            w.line("EC_REQUIRE(out->rows == a->rows);");
            w.line("EC_REQUIRE(out->cols == b->cols);");
            w.for_loop("i", "a->rows", |w| {
                w.for_loop("j", "b->cols", |w| {
                    w.line(&format!("{scalar} acc = 0;"));
                    w.for_loop("k", "a->cols", |w| {
                        w.line("acc += a->data[i * a->cols + k] * b->data[k * b->cols + j];");
                    });
                    w.line("out->data[i * out->cols + j] = acc;");
                });
            });
        });

        let format = ty.shape.scalar.printf_format();
        self.function(
            &format!("void {name}_write(FILE *stream, const {name} *m)"),
            |w| {
                w.line("size_t n = m->rows * m->cols;");
                w.for_loop("i", "n", |w| {
                    w.line(&format!("fprintf(stream, \"{format}\\n\", m->data[i]);"));
                });
            },
        );
    }

    /// `#define ec_add(a, b, out) _Generic((a), T *: T_add, const T *: T_add, ...)(a, b, out)`
    fn write_dispatch(&mut self, macro_name: &str, kernel: &str, params: &str, types: &[MatrixType]) {
        self.line(&format!("#define {macro_name}({params}) _Generic((a), \\"));
        let mut arms = Vec::with_capacity(types.len() * 2);
        for ty in types {
            let name = ty.symbol.as_str();
            arms.push(format!("{name} *: {name}_{kernel}"));
            arms.push(format!("const {name} *: {name}_{kernel}"));
        }
        let last = arms.len() - 1;
        for (i, arm) in arms.iter().enumerate() {
            let sep = if i == last { "" } else { "," };
            self.line(&format!("    {arm}{sep} \\"));
        }
        self.line(&format!("    )({params})"));
        self.blank();
    }

    fn function(&mut self, signature: &str, body: impl FnOnce(&mut Self)) {
        self.line(&format!("static inline {signature}"));
        self.line("{");
        self.indented(body);
        self.line("}");
        self.blank();
    }

    fn for_loop(&mut self, var: &str, bound: &str, body: impl FnOnce(&mut Self)) {
        self.line(&format!("for (size_t {var} = 0; {var} < {bound}; ++{var}) {{"));
        self.indented(body);
        self.line("}");
    }

    fn indented(&mut self, body: impl FnOnce(&mut Self)) {
        self.indent_level += 1;
        body(self);
        self.indent_level -= 1;
    }

    fn line(&mut self, text: &str) {
        let indent = "    ".repeat(self.indent_level);
        let _ = writeln!(self.out, "{indent}{text}");
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }
}

fn comment_safe(text: &str) -> String {
    text.replace("*/", "* /")
}
