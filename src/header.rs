use crate::table::{GlyphTable, FIRST_CHAR, LAST_CHAR};

/// The shared header emitted once per run: the struct type every generated
/// font instantiates, plus the catalog-wide memory estimate.
pub fn shared_header(total_memory: usize) -> String {
    format!(
        "#pragma once\n\
         \n\
         // Estimated total memory usage: {} bytes\n\
         \n\
         // Declare a function pointer type\n\
         typedef const unsigned int* (*FontBitmapFunctionType)(const char);\n\
         \n\
         // Struct for storing the font data\n\
         typedef struct {{\n\
         \x20   FontBitmapFunctionType function;\n\
         \x20   unsigned int size;\n\
         \x20   unsigned int width;\n\
         \x20   unsigned int height;\n\
         }} FontStruct;\n",
        total_memory
    )
}

/// One generated font header: the padded run-length table, the character
/// accessor and the populated FontStruct instance.
pub fn font_header(name: &str, table: &GlyphTable) -> String {
    let symbol = format!("{}{}", name, table.height);
    let mut out = String::new();

    out.push_str(&format!(
        "#pragma once\n\
         \n\
         // Include the font struct for storing the font data\n\
         #include \"FontStruct.h\"\n\
         \n\
         // Estimated memory usage: {} bytes\n\
         \n\
         // Font bitmap data\n\
         static const unsigned int {}_bitmaps[{}][{}] = {{\n",
        table.memory_usage(),
        symbol,
        table.rows.len(),
        table.columns
    ));

    for (ch, row) in (FIRST_CHAR..=LAST_CHAR).zip(&table.rows) {
        let cells: Vec<String> = row.iter().map(|run| format!("0x{:02x}", run)).collect();
        out.push_str(&format!(
            "\t{{{}}},\t//{} ({})\n",
            cells.join(","),
            char_comment(ch),
            ch as u32
        ));
    }
    out.push_str("};\n\n");

    out.push_str(&format!(
        "// Function for getting the bitmap of a character\n\
         static const unsigned int* {symbol}_bitmap(const char c) {{\n\
         \x20   if (c < 0x20 || c > 0x7e) return nullptr;\n\
         \x20   return {symbol}_bitmaps[c - 0x20];\n\
         }}\n\
         \n\
         // Font struct\n\
         FontStruct {symbol} = {{\n\
         \x20   .function = {symbol}_bitmap,\n\
         \x20   .size = {},\n\
         \x20   .width = {},\n\
         \x20   .height = {}\n\
         }};\n",
        table.columns,
        table.width,
        table.height,
        symbol = symbol
    ));

    out
}

// Human readable description for the row comments; characters that would
// break the comment get spelled out.
fn char_comment(ch: char) -> String {
    match ch {
        '\\' => "Character Backslash".to_string(),
        '\n' => "Character Newline".to_string(),
        '\r' => "Character Carriage Return".to_string(),
        '\t' => "Character Tab".to_string(),
        _ => format!("Character {}", ch),
    }
}
