//! CLI 格式化输出
//!
//! 提供命令行友好的错误显示和源码上下文打印。

use frame_core::ReadError;

/// 打印错误并显示源代码上下文
pub fn print_error_with_source(e: &ReadError, source: &str) {
    eprintln!("error: {}", e);

    if let (Some(error_line), Some(col)) = (e.line(), e.column()) {
        print_source_context(source, error_line, col);
    }
}

/// 打印源代码上下文（显示错误行前后几行）
pub fn print_source_context(source: &str, error_line: usize, error_col: usize) {
    const CONTEXT_LINES: usize = 2;

    let mut lines: Vec<&str> = source.lines().collect();
    // 输入以换行结尾时，末尾位置落在最后一个空行上
    if source.is_empty() || source.ends_with('\n') {
        lines.push("");
    }
    let total_lines = lines.len();

    if error_line == 0 || error_line > total_lines {
        return;
    }

    let start_line = error_line.saturating_sub(CONTEXT_LINES).max(1);
    let end_line = (error_line + CONTEXT_LINES).min(total_lines);
    let width = end_line.to_string().len();

    eprintln!("{}|--", "-".repeat(width + 1));
    for line_idx in start_line..=end_line {
        eprintln!("{:>width$} | {}", line_idx, lines[line_idx - 1]);
        if line_idx == error_line {
            // 指向出错列
            eprintln!("{:width$} | {}^", "", " ".repeat(error_col.saturating_sub(1)));
        }
    }
    eprintln!("{}|--", "-".repeat(width + 1));
}
