use std::io;

use bulkrate::{
    access::{Role, navigation},
    receipt::write_table,
};
use clap::Args;
use tabled::{builder::Builder, settings::object::Columns};

#[derive(Debug, Args)]
pub(crate) struct AccessArgs {
    /// Role: `super_admin`, `sales_manager`, `warehouse_staff`, `accountant` or `client`
    #[arg(long)]
    role: Role,
}

pub(crate) fn run(AccessArgs { role }: AccessArgs, mut out: impl io::Write) -> Result<(), String> {
    writeln!(
        out,
        "{} ({}), home {}",
        role.label(),
        role,
        role.portal().home_path()
    )
    .map_err(|error| error.to_string())?;

    let mut builder = Builder::default();

    builder.push_record(["#", "Page", "Path"]);

    for (idx, resource) in navigation(role).into_iter().enumerate() {
        builder.push_record([
            (idx + 1).to_string(),
            resource.label().to_string(),
            resource.path().to_string(),
        ]);
    }

    write_table(&mut out, builder, Columns::new(0..1)).map_err(|error| error.to_string())
}
