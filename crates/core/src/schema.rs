//! Versioned column layouts for the three mirrored tables.
//!
//! Every schema change is additive: new columns append after the existing
//! ones, never reorder them, so rows written under an older version still
//! decode. The end column of every range is derived from the column list;
//! there is no hand-maintained end-column literal anywhere.

#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub header: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct ColumnSchema {
    pub sheet: &'static str,
    pub version: u8,
    pub columns: &'static [Column],
}

impl ColumnSchema {
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Letter of the last column, e.g. "M" for a 13-column layout.
    pub fn end_column(&self) -> String {
        column_letters(self.columns.len())
    }

    /// Full-table range: `Sheet!A:<end>`.
    pub fn full_range(&self) -> String {
        format!("{}!A:{}", self.sheet, self.end_column())
    }

    /// Identifier column only: `Sheet!A:A`.
    pub fn id_range(&self) -> String {
        format!("{}!A:A", self.sheet)
    }

    /// One full row at a 1-based position: `Sheet!A<n>:<end><n>`.
    pub fn row_range(&self, row: u32) -> String {
        format!("{}!A{}:{}{}", self.sheet, row, self.end_column(), row)
    }

    pub fn headers(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.header.to_string()).collect()
    }
}

/// 1-based column index to spreadsheet letters: 1 -> A, 26 -> Z, 27 -> AA.
pub fn column_letters(index: usize) -> String {
    debug_assert!(index >= 1);
    let mut n = index;
    let mut out = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        out.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

macro_rules! columns {
    ($($header:literal),+ $(,)?) => {
        &[$(Column { header: $header }),+]
    };
}

// ============================================================================
// Finance ("Financeiro"): v1 A..K, v2 adds payment date (L), v3 adds the
// attachment flag (M).
// ============================================================================

pub static FINANCE_V1: ColumnSchema = ColumnSchema {
    sheet: "Financeiro",
    version: 1,
    columns: columns![
        "ID",
        "Data",
        "Tipo",
        "Categoria",
        "Descrição",
        "Valor",
        "Meio de Pagamento",
        "Centro de Custo",
        "Beneficiário",
        "Status",
        "Observações",
    ],
};

pub static FINANCE_V2: ColumnSchema = ColumnSchema {
    sheet: "Financeiro",
    version: 2,
    columns: columns![
        "ID",
        "Data",
        "Tipo",
        "Categoria",
        "Descrição",
        "Valor",
        "Meio de Pagamento",
        "Centro de Custo",
        "Beneficiário",
        "Status",
        "Observações",
        "Data de Pagamento",
    ],
};

pub static FINANCE_V3: ColumnSchema = ColumnSchema {
    sheet: "Financeiro",
    version: 3,
    columns: columns![
        "ID",
        "Data",
        "Tipo",
        "Categoria",
        "Descrição",
        "Valor",
        "Meio de Pagamento",
        "Centro de Custo",
        "Beneficiário",
        "Status",
        "Observações",
        "Data de Pagamento",
        "Comprovante",
    ],
};

// ============================================================================
// Inventory ("Estoque"): v1 A..K, v2 adds validity (L).
// ============================================================================

pub static INVENTORY_V1: ColumnSchema = ColumnSchema {
    sheet: "Estoque",
    version: 1,
    columns: columns![
        "ID",
        "SKU",
        "Nome",
        "Quantidade",
        "Unidade",
        "Qtd. Mínima",
        "Categoria",
        "Preço de Custo",
        "Fornecedor",
        "Observações",
        "Última Movimentação",
    ],
};

pub static INVENTORY_V2: ColumnSchema = ColumnSchema {
    sheet: "Estoque",
    version: 2,
    columns: columns![
        "ID",
        "SKU",
        "Nome",
        "Quantidade",
        "Unidade",
        "Qtd. Mínima",
        "Categoria",
        "Preço de Custo",
        "Fornecedor",
        "Observações",
        "Última Movimentação",
        "Validade",
    ],
};

// ============================================================================
// Orders ("Pedidos"): v1 A..J, v2 adds observation (K).
// ============================================================================

pub static ORDERS_V1: ColumnSchema = ColumnSchema {
    sheet: "Pedidos",
    version: 1,
    columns: columns![
        "ID",
        "Data do Pedido",
        "Data de Entrega",
        "Cliente",
        "Descrição",
        "Valor Total",
        "Pagamento",
        "Status",
        "Entrega",
        "Contato",
    ],
};

pub static ORDERS_V2: ColumnSchema = ColumnSchema {
    sheet: "Pedidos",
    version: 2,
    columns: columns![
        "ID",
        "Data do Pedido",
        "Data de Entrega",
        "Cliente",
        "Descrição",
        "Valor Total",
        "Pagamento",
        "Status",
        "Entrega",
        "Contato",
        "Observações",
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_columns_are_derived() {
        assert_eq!(FINANCE_V1.end_column(), "K");
        assert_eq!(FINANCE_V2.end_column(), "L");
        assert_eq!(FINANCE_V3.end_column(), "M");
        assert_eq!(INVENTORY_V1.end_column(), "K");
        assert_eq!(INVENTORY_V2.end_column(), "L");
        assert_eq!(ORDERS_V1.end_column(), "J");
        assert_eq!(ORDERS_V2.end_column(), "K");
    }

    #[test]
    fn schema_versions_are_additive() {
        for (older, newer) in [
            (&FINANCE_V1, &FINANCE_V2),
            (&FINANCE_V2, &FINANCE_V3),
            (&INVENTORY_V1, &INVENTORY_V2),
            (&ORDERS_V1, &ORDERS_V2),
        ] {
            assert_eq!(newer.width(), older.width() + 1);
            for (a, b) in older.columns.iter().zip(newer.columns.iter()) {
                assert_eq!(a.header, b.header);
            }
        }
    }

    #[test]
    fn ranges_come_from_the_schema() {
        assert_eq!(FINANCE_V3.full_range(), "Financeiro!A:M");
        assert_eq!(FINANCE_V3.id_range(), "Financeiro!A:A");
        assert_eq!(FINANCE_V3.row_range(5), "Financeiro!A5:M5");
        assert_eq!(ORDERS_V2.full_range(), "Pedidos!A:K");
    }

    #[test]
    fn column_letters_past_z() {
        assert_eq!(column_letters(1), "A");
        assert_eq!(column_letters(26), "Z");
        assert_eq!(column_letters(27), "AA");
        assert_eq!(column_letters(52), "AZ");
    }
}
