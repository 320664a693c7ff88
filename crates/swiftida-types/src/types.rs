//! Aggregate type representation for synthesized return tuples.

use serde::{Deserialize, Serialize};

/// Structure type details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructType {
    pub name: String,
    /// Fields in order.
    pub fields: Vec<StructField>,
    /// Total size in bytes (including padding).
    pub size: usize,
    /// Alignment requirement.
    pub alignment: usize,
}

impl StructType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            size: 0,
            alignment: 1,
        }
    }

    /// A struct of `words` 8-byte fields named `o0`, `o1`, ...
    pub fn tuple(name: impl Into<String>, words: usize) -> Self {
        let mut st = Self::new(name);
        for j in 0..words {
            st.add_field(format!("o{}", j), "__int64", 8, 8);
        }
        st.finalize();
        st
    }

    /// Add a field and update size/alignment.
    pub fn add_field(
        &mut self,
        name: impl Into<String>,
        type_name: impl Into<String>,
        size: usize,
        align: usize,
    ) {
        let align = align.max(1);
        let offset = (self.size + align - 1) & !(align - 1);

        self.fields.push(StructField {
            name: name.into(),
            type_name: type_name.into(),
            offset,
            size,
        });

        self.size = offset + size;
        self.alignment = self.alignment.max(align);
    }

    /// Finalize the struct (add trailing padding).
    pub fn finalize(&mut self) {
        if self.alignment > 1 {
            self.size = (self.size + self.alignment - 1) & !(self.alignment - 1);
        }
    }

    /// Render as a C struct definition.
    pub fn to_c_string(&self) -> String {
        let mut out = format!("struct {} {{\n", self.name);
        for field in &self.fields {
            out.push_str(&format!(
                "    {} {}; // +{:#x}\n",
                field.type_name, field.name, field.offset
            ));
        }
        out.push_str("};");
        out
    }
}

/// A field in a struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructField {
    pub name: String,
    pub type_name: String,
    /// Byte offset from the start of the struct.
    pub offset: usize,
    pub size: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tuple_layout() {
        let st = StructType::tuple("swiftida_tuple3", 3);
        assert_eq!(st.name, "swiftida_tuple3");
        assert_eq!(st.fields.len(), 3);
        assert_eq!(st.size, 24);
        assert_eq!(st.alignment, 8);
        let offsets: Vec<usize> = st.fields.iter().map(|f| f.offset).collect();
        assert_eq!(offsets, vec![0, 8, 16]);
        assert_eq!(st.fields[2].name, "o2");
    }

    #[test]
    fn test_padding() {
        let mut st = StructType::new("mixed");
        st.add_field("a", "char", 1, 1);
        st.add_field("b", "__int64", 8, 8);
        st.add_field("c", "char", 1, 1);
        st.finalize();
        assert_eq!(st.fields[1].offset, 8);
        assert_eq!(st.size, 24);
    }

    #[test]
    fn test_to_c_string() {
        let st = StructType::tuple("swiftida_tuple2", 2);
        let c = st.to_c_string();
        assert!(c.starts_with("struct swiftida_tuple2 {"));
        assert!(c.contains("__int64 o0; // +0x0"));
        assert!(c.contains("__int64 o1; // +0x8"));
        assert!(c.ends_with("};"));
    }
}
