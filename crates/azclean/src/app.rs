use clap::{Arg, ArgAction, Command, value_parser};

pub fn build_cli() -> Command {
    Command::new("azclean")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Delete expired resources and empty resource groups in an Azure subscription")
        .long_about(
            "azclean deletes every resource in a subscription that was created more than \
            <TTL_DAYS> days ago, newest first, then deletes resource groups that are left \
            empty. Resources under a configured persist prefix are never touched.\n\n\
            The run aborts without deleting anything if the subscription's display name \
            does not match <SUBSCRIPTION_NAME>. The exit code is 1 if any deletion failed.",
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("subscription-id")
                .help("Subscription to clean")
                .value_name("SUBSCRIPTION_ID")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("subscription-name")
                .help("Expected display name of the subscription (safety check)")
                .value_name("SUBSCRIPTION_NAME")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::new("ttl")
                .help("Delete resources created more than this many days ago")
                .value_name("TTL_DAYS")
                .required(true)
                .value_parser(value_parser!(u32))
                .index(3),
        )
        .arg(
            Arg::new("client-id")
                .help("Service principal application id")
                .value_name("CLIENT_ID")
                .required(true)
                .index(4),
        )
        .arg(
            Arg::new("client-secret")
                .help("Service principal secret")
                .value_name("CLIENT_SECRET")
                .required(true)
                .index(5),
        )
        .arg(
            Arg::new("tenant-id")
                .help("Azure Active Directory tenant id")
                .value_name("TENANT_ID")
                .required(true)
                .index(6),
        )
        .arg(
            Arg::new("environment")
                .help("Cloud environment: global (default), china, usa, german. Unknown values use global")
                .value_name("ENVIRONMENT")
                .index(7),
        )
}
