use crate::common::*;

/// Load the list of class names from a file, one name per line.
///
/// Blank lines and surrounding whitespace are ignored.
pub async fn load_classes_file(path: impl AsRef<Path>) -> Result<IndexSet<String>> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path).await?;

    let names: Vec<_> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let classes: IndexSet<String> = names.iter().map(|&name| name.to_owned()).collect();

    ensure!(
        classes.len() == names.len(),
        "duplicated class names found in '{}'",
        path.display()
    );
    ensure!(
        !classes.is_empty(),
        "no classes found in '{}'",
        path.display()
    );

    Ok(classes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn load_classes_file_skips_blank_lines() -> Result<()> {
        let file = std::env::temp_dir().join("ssd-dl-classes-test.txt");
        tokio::fs::write(&file, "car\n  pedestrian\n\ncyclist\n").await?;

        let classes = load_classes_file(&file).await?;
        let expect: IndexSet<String> = ["car", "pedestrian", "cyclist"]
            .iter()
            .map(|&name| name.to_owned())
            .collect();
        assert_eq!(classes, expect);

        tokio::fs::remove_file(&file).await?;
        Ok(())
    }

    #[tokio::test]
    async fn load_classes_file_rejects_duplicates() -> Result<()> {
        let file = std::env::temp_dir().join("ssd-dl-dup-classes-test.txt");
        tokio::fs::write(&file, "car\ncar\n").await?;

        assert!(load_classes_file(&file).await.is_err());

        tokio::fs::remove_file(&file).await?;
        Ok(())
    }
}
