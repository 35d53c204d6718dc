//! Offset bookkeeping for generated texts.
//!
//! Given the drawn occurrences in order, builds the flat symbol sequence plus
//! the occurrence table (one row per occurrence, inclusive bounds) and the
//! symbol table (one row per symbol).

use crate::types::logical_operation::{LogicalOperation, Symbol};
use crate::types::text_entry::{OccurrenceLocation, SymbolLocation};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextLayout {
    pub text: Vec<Symbol>,
    pub occurrences: Vec<OccurrenceLocation>,
    pub symbols: Vec<SymbolLocation>,
}

pub fn layout_occurrences(drawn: &[LogicalOperation]) -> TextLayout {
    let total: usize = drawn.iter().map(LogicalOperation::len).sum();
    let mut layout = TextLayout {
        text: Vec::with_capacity(total),
        occurrences: Vec::with_capacity(drawn.len()),
        symbols: Vec::with_capacity(total),
    };

    let mut offset = 0;
    for op in drawn {
        let size = op.len();
        layout.occurrences.push(OccurrenceLocation {
            logical_operation: op.clone(),
            begin_index: offset,
            end_index: offset + size - 1,
        });
        for (operation_index, symbol) in op.symbols().iter().enumerate() {
            layout.symbols.push(SymbolLocation {
                logical_operation: op.clone(),
                symbol: symbol.clone(),
                text_index: offset + operation_index,
                operation_index,
            });
            layout.text.push(symbol.clone());
        }
        offset += size;
    }
    layout
}
