//! Name resolution: lexical scopes plus the statement binding overlay.
//!
//! Lookup order is overlay frames (innermost first), then function locals,
//! then globals, then builtins. A frame is pushed for every statement and
//! popped when that statement finishes, however it finishes; `(expr as
//! name)` writes into the innermost frame, and plain assignment removes the
//! name from every frame before writing to the lexical store.
//!
//! Each function call runs in its own activation: caller frames and locals
//! are invisible to the callee, and the callee's overlay starts empty.
//!
//! Programs that never bind with `as` skip the frame scan entirely: each
//! activation counts its live entries, and lookups consult frames only when
//! the count is nonzero.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use tern_ir::{Name, Span};

use crate::value::Value;

/// One `as` binding: the name, its value, and where it was bound.
#[derive(Clone, Debug)]
struct BindingEntry {
    name: Name,
    value: Value,
    as_span: Span,
}

/// Bindings made by a single statement, in evaluation order.
///
/// Two inline slots cover almost every real statement, so opening and
/// closing an empty frame never touches the heap.
type StmtFrame = SmallVec<[BindingEntry; 2]>;

/// A function activation (or the top level) and its overlay state.
struct Activation {
    /// Function-local variables. The top-level activation leaves this empty
    /// and writes to globals instead.
    locals: FxHashMap<Name, Value>,
    top_level: bool,
    /// Statement frames, innermost last.
    frames: Vec<StmtFrame>,
    /// Live binding entries across all frames.
    live: usize,
    /// Sites of bindings that have already expired, for name-error notes.
    expired: FxHashMap<Name, Span>,
}

impl Activation {
    fn top_level() -> Self {
        Activation {
            locals: FxHashMap::default(),
            top_level: true,
            frames: Vec::new(),
            live: 0,
            expired: FxHashMap::default(),
        }
    }

    fn for_call(locals: FxHashMap<Name, Value>) -> Self {
        Activation {
            locals,
            top_level: false,
            frames: Vec::new(),
            live: 0,
            expired: FxHashMap::default(),
        }
    }
}

/// The interpreter's variable store.
pub struct Environment {
    globals: FxHashMap<Name, Value>,
    builtins: FxHashMap<Name, Value>,
    /// Activation stack; index 0 is the top level and is never popped.
    activations: Vec<Activation>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            globals: FxHashMap::default(),
            builtins: FxHashMap::default(),
            activations: vec![Activation::top_level()],
        }
    }

    fn current(&self) -> &Activation {
        let Some(activation) = self.activations.last() else {
            unreachable!("the top-level activation is never popped")
        };
        activation
    }

    fn current_mut(&mut self) -> &mut Activation {
        let Some(activation) = self.activations.last_mut() else {
            unreachable!("the top-level activation is never popped")
        };
        activation
    }

    /// Register a builtin; consulted after globals so user definitions win.
    pub fn define_builtin(&mut self, name: Name, value: Value) {
        self.builtins.insert(name, value);
    }

    /// Resolve a name, cloning the value out.
    pub fn lookup(&self, name: Name) -> Option<Value> {
        let act = self.current();
        if act.live > 0 {
            for frame in act.frames.iter().rev() {
                // At most one entry per name per frame: rebinding
                // overwrites in place.
                if let Some(entry) = frame.iter().find(|e| e.name == name) {
                    return Some(entry.value.clone());
                }
            }
        }
        if !act.top_level {
            if let Some(value) = act.locals.get(&name) {
                return Some(value.clone());
            }
        }
        if let Some(value) = self.globals.get(&name) {
            return Some(value.clone());
        }
        self.builtins.get(&name).cloned()
    }

    /// Open a binding frame for a statement.
    pub fn push_frame(&mut self) {
        self.current_mut().frames.push(StmtFrame::new());
    }

    /// Close the innermost frame, expiring its bindings.
    pub fn pop_frame(&mut self) {
        let act = self.current_mut();
        let Some(frame) = act.frames.pop() else {
            unreachable!("pop_frame without a matching push_frame")
        };
        act.live -= frame.len();
        for entry in frame {
            act.expired.insert(entry.name, entry.as_span);
        }
    }

    /// Record a `(expr as name)` binding in the innermost frame.
    ///
    /// Binding a name the frame already holds overwrites the entry in place,
    /// keeping its original position in evaluation order.
    pub fn bind_statement(&mut self, name: Name, value: Value, as_span: Span) {
        let act = self.current_mut();
        let Some(frame) = act.frames.last_mut() else {
            unreachable!("statement bindings require an open frame")
        };
        if let Some(entry) = frame.iter_mut().find(|e| e.name == name) {
            entry.value = value;
            entry.as_span = as_span;
        } else {
            frame.push(BindingEntry {
                name,
                value,
                as_span,
            });
            act.live += 1;
        }
    }

    /// Ordinary assignment: remove the name from every active frame, then
    /// write through to the lexical store.
    pub fn assign(&mut self, name: Name, value: Value) {
        let act = self.current_mut();
        if act.live > 0 {
            let mut removed = 0;
            for frame in &mut act.frames {
                if let Some(idx) = frame.iter().position(|e| e.name == name) {
                    frame.remove(idx);
                    removed += 1;
                }
            }
            act.live -= removed;
        }
        act.expired.remove(&name);
        let top_level = act.top_level;

        if top_level {
            self.globals.insert(name, value);
        } else {
            self.current_mut().locals.insert(name, value);
        }
    }

    /// Where an expired statement binding of this name was made, if the
    /// current activation remembers one.
    pub fn expired_binding(&self, name: Name) -> Option<Span> {
        self.current().expired.get(&name).copied()
    }

    /// Enter a function call with its parameters pre-bound.
    pub fn push_activation(&mut self, locals: FxHashMap<Name, Value>) {
        self.activations.push(Activation::for_call(locals));
    }

    /// Leave a function call, dropping its locals and overlay.
    pub fn pop_activation(&mut self) {
        if self.activations.len() > 1 {
            self.activations.pop();
        }
    }

    /// Open frames in the current activation.
    pub fn frame_depth(&self) -> usize {
        self.current().frames.len()
    }

    /// Live statement bindings in the current activation.
    pub fn live_bindings(&self) -> usize {
        self.current().live
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tern_ir::StringInterner;

    use super::*;

    fn int(n: i64) -> Value {
        Value::Int(n)
    }

    #[test]
    fn overlay_shadows_global_until_frame_pops() {
        let interner = StringInterner::new();
        let x = interner.intern("x");
        let mut env = Environment::new();

        env.assign(x, int(1));
        env.push_frame();
        env.bind_statement(x, int(2), Span::new(4, 5));
        assert_eq!(env.lookup(x), Some(int(2)));

        env.pop_frame();
        assert_eq!(env.lookup(x), Some(int(1)));
        assert_eq!(env.expired_binding(x), Some(Span::new(4, 5)));
    }

    #[test]
    fn rebinding_overwrites_in_place() {
        let interner = StringInterner::new();
        let x = interner.intern("x");
        let mut env = Environment::new();

        env.push_frame();
        env.bind_statement(x, int(1), Span::new(0, 1));
        env.bind_statement(x, int(2), Span::new(8, 9));
        assert_eq!(env.live_bindings(), 1);
        assert_eq!(env.lookup(x), Some(int(2)));

        env.pop_frame();
        assert_eq!(env.expired_binding(x), Some(Span::new(8, 9)));
    }

    #[test]
    fn nested_frames_shadow_and_restore() {
        let interner = StringInterner::new();
        let x = interner.intern("x");
        let mut env = Environment::new();

        env.push_frame();
        env.bind_statement(x, int(1), Span::DUMMY);
        env.push_frame();
        env.bind_statement(x, int(2), Span::DUMMY);
        assert_eq!(env.lookup(x), Some(int(2)));
        assert_eq!(env.live_bindings(), 2);

        env.pop_frame();
        assert_eq!(env.lookup(x), Some(int(1)));

        env.pop_frame();
        assert_eq!(env.lookup(x), None);
        assert_eq!(env.live_bindings(), 0);
    }

    #[test]
    fn assignment_clears_every_frame_and_writes_through() {
        let interner = StringInterner::new();
        let x = interner.intern("x");
        let mut env = Environment::new();

        env.push_frame();
        env.bind_statement(x, int(1), Span::DUMMY);
        env.push_frame();
        env.bind_statement(x, int(2), Span::DUMMY);

        env.assign(x, int(9));
        assert_eq!(env.live_bindings(), 0);
        assert_eq!(env.lookup(x), Some(int(9)));

        env.pop_frame();
        env.pop_frame();
        assert_eq!(env.lookup(x), Some(int(9)));
        // The write cleared the entries, so nothing expired.
        assert_eq!(env.expired_binding(x), None);
    }

    #[test]
    fn empty_frames_keep_live_count_zero() {
        let interner = StringInterner::new();
        let x = interner.intern("x");
        let mut env = Environment::new();

        env.assign(x, int(7));
        env.push_frame();
        env.push_frame();
        assert_eq!(env.live_bindings(), 0);
        assert_eq!(env.lookup(x), Some(int(7)));
        env.pop_frame();
        env.pop_frame();
    }

    #[test]
    fn activations_hide_caller_bindings() {
        let interner = StringInterner::new();
        let x = interner.intern("x");
        let g = interner.intern("g");
        let mut env = Environment::new();

        env.assign(g, int(5));
        env.push_frame();
        env.bind_statement(x, int(1), Span::DUMMY);

        env.push_activation(FxHashMap::default());
        assert_eq!(env.lookup(x), None, "caller binding must be invisible");
        assert_eq!(env.lookup(g), Some(int(5)), "globals stay visible");
        assert_eq!(env.live_bindings(), 0);
        env.pop_activation();

        assert_eq!(env.lookup(x), Some(int(1)));
        env.pop_frame();
    }

    #[test]
    fn function_locals_shadow_globals() {
        let interner = StringInterner::new();
        let x = interner.intern("x");
        let mut env = Environment::new();

        env.assign(x, int(1));
        env.push_activation(FxHashMap::default());
        env.assign(x, int(5));
        assert_eq!(env.lookup(x), Some(int(5)));
        env.pop_activation();

        // The function wrote its own local, not the global.
        assert_eq!(env.lookup(x), Some(int(1)));
    }

    #[test]
    fn globals_shadow_builtins() {
        let interner = StringInterner::new();
        let name = interner.intern("print");
        let mut env = Environment::new();

        env.define_builtin(name, int(100));
        assert_eq!(env.lookup(name), Some(int(100)));

        env.assign(name, int(3));
        assert_eq!(env.lookup(name), Some(int(3)));
    }

    #[test]
    fn expired_site_tracks_latest_binding() {
        let interner = StringInterner::new();
        let x = interner.intern("x");
        let mut env = Environment::new();

        env.push_frame();
        env.bind_statement(x, int(1), Span::new(0, 1));
        env.pop_frame();

        env.push_frame();
        env.bind_statement(x, int(2), Span::new(10, 11));
        env.pop_frame();

        assert_eq!(env.expired_binding(x), Some(Span::new(10, 11)));
    }
}
