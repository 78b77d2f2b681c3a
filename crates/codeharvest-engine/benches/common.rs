// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_response(files: usize) -> String {
    let mut content = String::from("Sure! Here's the project you asked for:\n\n");

    for i in 0..files {
        match i % 4 {
            0 => content.push_str(&format!(
                "File: src/module_{i}.js\n```js\nfunction handler{i}(event) {{\n  return event.value * {i};\n}}\n```\n\n"
            )),
            1 => content.push_str(&format!(
                "```python\n# filename: app/task_{i}.py\ndef task_{i}():\n    return {i}\n```\n\n"
            )),
            2 => content.push_str(&format!(
                "Some styling for section {i}:\n\n```css\n.section-{i} {{\n  margin: {i}px;\n}}\n```\n\n"
            )),
            _ => content.push_str(&format!(
                "This part explains how step {i} fits together with the rest.\n\n```\nconst value{i} = compute({i});\n```\n\n"
            )),
        }
    }

    content
}

#[allow(dead_code)]
pub fn generate_prose(paragraphs: usize) -> String {
    "Consider restructuring everything around smaller reusable components because maintainability matters.\n\n"
        .repeat(paragraphs)
}
