//! Rule expressions compiled to Thompson-style programs, run with a Pike VM
//! anchored at a boundary.

use super::parser::Node;
use super::set::CharClass;
use crate::properties::PropertyOracle;
use crate::text::{Position, TextBuffer};

#[derive(Debug, Clone)]
enum Inst {
    /// Consume one character belonging to the class.
    Class(CharClass),
    Split(usize, usize),
    Jump(usize),
    /// Record the current position as the break position.
    Mark,
    Match,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Match {
    pub end: Position,
    pub mark: Option<Position>,
}

#[derive(Debug, Clone, Copy)]
struct Thread {
    pc: usize,
    mark: Option<Position>,
}

#[derive(Debug, Clone)]
pub(super) struct Program {
    insts: Vec<Inst>,
}

impl Program {
    pub fn compile(node: &Node) -> Self {
        let mut insts = Vec::new();
        emit(&mut insts, node);
        insts.push(Inst::Match);
        Self { insts }
    }

    /// Runs the program from `start` and returns its longest match, which
    /// may be empty.
    pub fn longest_match(
        &self,
        text: &TextBuffer,
        start: Position,
        oracle: &dyn PropertyOracle,
    ) -> Option<Match> {
        let mut current = Vec::new();
        let mut next = Vec::new();
        let mut seen = vec![false; self.insts.len()];
        self.add_thread(&mut current, &mut seen, 0, None, start);

        let mut best = None;
        let mut at = start;
        let mut chars = text.chars_from(start);
        loop {
            if let Some(t) = current
                .iter()
                .find(|t| matches!(self.insts[t.pc], Inst::Match))
            {
                best = Some(Match {
                    end: at,
                    mark: t.mark,
                });
            }
            if !current
                .iter()
                .any(|t| matches!(self.insts[t.pc], Inst::Class(_)))
            {
                break;
            }
            let Some((_, c)) = chars.next() else {
                break;
            };
            at = Position::new_unchecked(at.code_unit_offset() + c.len_utf16());
            seen.fill(false);
            for t in current.drain(..) {
                if let Inst::Class(class) = &self.insts[t.pc] {
                    if class.contains(c, oracle) {
                        self.add_thread(&mut next, &mut seen, t.pc + 1, t.mark, at);
                    }
                }
            }
            std::mem::swap(&mut current, &mut next);
        }
        best
    }

    fn add_thread(
        &self,
        list: &mut Vec<Thread>,
        seen: &mut [bool],
        pc: usize,
        mark: Option<Position>,
        at: Position,
    ) {
        if std::mem::replace(&mut seen[pc], true) {
            return;
        }
        match self.insts[pc] {
            Inst::Jump(to) => self.add_thread(list, seen, to, mark, at),
            Inst::Split(first, second) => {
                self.add_thread(list, seen, first, mark, at);
                self.add_thread(list, seen, second, mark, at);
            }
            Inst::Mark => self.add_thread(list, seen, pc + 1, Some(at), at),
            Inst::Class(_) | Inst::Match => list.push(Thread { pc, mark }),
        }
    }
}

fn emit(insts: &mut Vec<Inst>, node: &Node) {
    match node {
        Node::Class(class) => insts.push(Inst::Class(class.clone())),
        Node::Mark => insts.push(Inst::Mark),
        Node::Concat(items) => {
            for item in items {
                emit(insts, item);
            }
        }
        Node::Alt(branches) => {
            let mut exits = Vec::new();
            let (last, rest) = match branches.split_last() {
                Some(split) => split,
                None => return,
            };
            for branch in rest {
                let split = insts.len();
                insts.push(Inst::Split(split + 1, 0));
                emit(insts, branch);
                exits.push(insts.len());
                insts.push(Inst::Jump(0));
                insts[split] = Inst::Split(split + 1, insts.len());
            }
            emit(insts, last);
            let end = insts.len();
            for exit in exits {
                insts[exit] = Inst::Jump(end);
            }
        }
        Node::Star(inner) => {
            let split = insts.len();
            insts.push(Inst::Split(0, 0));
            emit(insts, inner);
            insts.push(Inst::Jump(split));
            insts[split] = Inst::Split(split + 1, insts.len());
        }
        Node::Plus(inner) => {
            let start = insts.len();
            emit(insts, inner);
            insts.push(Inst::Split(start, insts.len() + 1));
        }
        Node::Optional(inner) => {
            let split = insts.len();
            insts.push(Inst::Split(0, 0));
            emit(insts, inner);
            insts[split] = Inst::Split(split + 1, insts.len());
        }
    }
}
